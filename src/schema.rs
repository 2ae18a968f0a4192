//! Expected schemas: built-in deployment presets and schema files.
//!
//! A schema is configuration, built once at startup and passed to the
//! [`crate::pipeline::Pipeline`]. Schema files are JSON:
//!
//! ```json
//! {"fields": [{"name": "Index", "type": "integer"}, {"name": "Name", "type": "string"}]}
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataType, Field, Schema};

/// Built-in expected schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPreset {
    /// Customer export used by command-line imports.
    Customers,
    /// Emissions inventory accepted by the upload endpoint.
    Emissions,
}

impl SchemaPreset {
    pub const ALL: [SchemaPreset; 2] = [SchemaPreset::Customers, SchemaPreset::Emissions];

    pub fn name(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Emissions => "emissions",
        }
    }

    pub fn schema(self) -> Schema {
        match self {
            Self::Customers => customers_schema(),
            Self::Emissions => emissions_schema(),
        }
    }
}

impl FromStr for SchemaPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                format!("unknown schema preset '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

fn schema_of(fields: &[(&str, DataType)]) -> Schema {
    Schema::new(
        fields
            .iter()
            .map(|(name, dt)| Field::new(*name, *dt))
            .collect(),
    )
}

/// `Index` plus eleven text columns.
pub fn customers_schema() -> Schema {
    schema_of(&[
        ("Index", DataType::Int64),
        ("Customer Id", DataType::Utf8),
        ("First Name", DataType::Utf8),
        ("Last Name", DataType::Utf8),
        ("Company", DataType::Utf8),
        ("City", DataType::Utf8),
        ("Country", DataType::Utf8),
        ("Phone 1", DataType::Utf8),
        ("Phone 2", DataType::Utf8),
        ("Email", DataType::Utf8),
        ("Subscription Date", DataType::Utf8),
        ("Website", DataType::Utf8),
    ])
}

/// Emissions inventory rows. Optional columns are plain fields: nulls are never checked.
pub fn emissions_schema() -> Schema {
    schema_of(&[
        ("Ano", DataType::Int64),
        ("Mês", DataType::Utf8),
        ("Escopo", DataType::Int64),
        ("Categoria", DataType::Utf8),
        ("Subcategoria", DataType::Utf8),
        ("Unidade_Operacional", DataType::Utf8),
        ("Setor", DataType::Utf8),
        ("Atividade", DataType::Utf8),
        ("Insumo_ou_produto", DataType::Utf8),
        ("Fossil_ou_biogenico", DataType::Utf8),
        ("Teor_de_carbono", DataType::Float64),
        ("Quantidade_do_insumo_ou_produto", DataType::Float64),
        ("Unidade_de_medida", DataType::Utf8),
        ("Possui_controle_operacional", DataType::Utf8),
        ("Tipo_de_dado_coletado", DataType::Utf8),
        ("Rastreabilidade", DataType::Utf8),
        ("Observacoes", DataType::Utf8),
    ])
}

/// Parse a schema from JSON text.
pub fn schema_from_json(text: &str) -> Result<Schema, serde_json::Error> {
    serde_json::from_str(text)
}

/// Load a schema file.
pub fn load_schema_file(path: impl AsRef<Path>) -> IngestionResult<Schema> {
    let path = path.as_ref();
    let schema_file_err = |message: String| IngestionError::SchemaFile {
        path: path.to_path_buf(),
        message,
    };
    let text = fs::read_to_string(path).map_err(|e| schema_file_err(e.to_string()))?;
    let schema = schema_from_json(&text).map_err(|e| schema_file_err(e.to_string()))?;
    if schema.fields.is_empty() {
        return Err(schema_file_err("schema declares no fields".to_string()));
    }
    Ok(schema)
}
