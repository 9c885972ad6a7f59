use crate::WikidataError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Copy)]
pub enum DataType {
    #[default]
    String,
    Url,
    Time,
    GlobeCoordinate,
    Quantity,
    Monolingualtext,
    CommonsMedia,
    GeoShape,
    TabularData,
    Math,
    MusicalNotation,
    ExternalId,
    WikibaseItem,
    WikibaseProperty,
    Lexeme,
    Form,
    Sense,
    EntitySchema,
}

impl DataType {
    /// Constructs a new `DataType` object from a (valid) snak datatype string.
    pub fn new<S: AsRef<str>>(s: S) -> Result<Self, WikidataError> {
        match s.as_ref() {
            "wikibase-item" => Ok(DataType::WikibaseItem),
            "external-id" => Ok(DataType::ExternalId),
            "url" => Ok(DataType::Url),
            "commonsMedia" => Ok(DataType::CommonsMedia),
            "monolingualtext" => Ok(DataType::Monolingualtext),
            "quantity" => Ok(DataType::Quantity),
            "string" => Ok(DataType::String),
            "time" => Ok(DataType::Time),
            "globe-coordinate" => Ok(DataType::GlobeCoordinate),
            "wikibase-property" => Ok(DataType::WikibaseProperty),
            "wikibase-lexeme" => Ok(DataType::Lexeme),
            "wikibase-form" => Ok(DataType::Form),
            "wikibase-sense" => Ok(DataType::Sense),
            "geo-shape" => Ok(DataType::GeoShape),
            "tabular-data" => Ok(DataType::TabularData),
            "math" => Ok(DataType::Math),
            "musical-notation" => Ok(DataType::MusicalNotation),
            "entity-schema" => Ok(DataType::EntitySchema),
            other => Err(WikidataError::UnknownDataType(other.into())),
        }
    }

    /// Guesses the datatype from the `datavalue.type` tag, for snaks that lack a `datatype`.
    pub fn from_value_type(value_type: &str, entity_type: Option<&str>) -> Result<Self, WikidataError> {
        match (value_type, entity_type) {
            ("wikibase-entityid", Some("property")) => Ok(DataType::WikibaseProperty),
            ("wikibase-entityid", Some("lexeme")) => Ok(DataType::Lexeme),
            ("wikibase-entityid", Some("form")) => Ok(DataType::Form),
            ("wikibase-entityid", Some("sense")) => Ok(DataType::Sense),
            ("wikibase-entityid", _) => Ok(DataType::WikibaseItem),
            ("string", _) => Ok(DataType::String),
            ("monolingualtext", _) => Ok(DataType::Monolingualtext),
            ("quantity", _) => Ok(DataType::Quantity),
            ("time", _) => Ok(DataType::Time),
            ("globecoordinate", _) => Ok(DataType::GlobeCoordinate),
            (other, _) => Err(WikidataError::UnknownDataType(other.into())),
        }
    }

    /// Returns the string representation of the data type.
    pub const fn as_str(&self) -> &str {
        match self {
            DataType::WikibaseItem => "wikibase-item",
            DataType::ExternalId => "external-id",
            DataType::Url => "url",
            DataType::CommonsMedia => "commonsMedia",
            DataType::Monolingualtext => "monolingualtext",
            DataType::Quantity => "quantity",
            DataType::String => "string",
            DataType::Time => "time",
            DataType::GlobeCoordinate => "globe-coordinate",
            DataType::WikibaseProperty => "wikibase-property",
            DataType::Lexeme => "wikibase-lexeme",
            DataType::Form => "wikibase-form",
            DataType::Sense => "wikibase-sense",
            DataType::GeoShape => "geo-shape",
            DataType::TabularData => "tabular-data",
            DataType::Math => "math",
            DataType::MusicalNotation => "musical-notation",
            DataType::EntitySchema => "entity-schema",
        }
    }

    /// True for the datatypes whose values are entities that get labels.
    pub const fn is_entity_reference(&self) -> bool {
        matches!(self, DataType::WikibaseItem | DataType::WikibaseProperty)
    }
}
