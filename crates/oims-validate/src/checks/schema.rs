//! Mapping vs. schema consistency.

use oims_model::{MappingDocument, SchemaDocument};

use crate::error::{Result, ValidationError};

/// Validate a mapping document against the target schema.
///
/// The mapping must name the schema it was validated against, and every
/// field-value pair must target an attribute the schema declares. Pairs with
/// another `information_type` (comments, tool notes) are not checked.
///
/// Returns the number of attribute ids checked.
pub fn check(mapping: &MappingDocument, schema: &SchemaDocument) -> Result<usize> {
    let schema_name = schema.metadata_name();
    if mapping.header.validated_schema_name != schema_name {
        return Err(ValidationError::SchemaMismatch {
            mapping_schema: mapping.header.validated_schema_name.clone(),
            schema_name: schema_name.to_string(),
        });
    }

    let permitted = schema.attribute_names();
    let mut checked = 0;
    for sheet_mapping in &mapping.content {
        for pair in &sheet_mapping.attribute_pairs {
            if !pair.is_field_value() {
                continue;
            }
            let Some(attribute_id) = pair.oims_attribute_id.as_deref() else {
                continue;
            };
            if !permitted.contains(attribute_id) {
                return Err(ValidationError::UnknownAttributeId {
                    attribute_id: attribute_id.to_string(),
                    sheet: sheet_mapping.sheetname.clone(),
                    permitted: permitted.iter().map(|name| (*name).to_string()).collect(),
                });
            }
            checked += 1;
        }
    }

    tracing::info!(
        schema = %schema_name,
        attributes_checked = checked,
        "Mapping matches schema"
    );
    Ok(checked)
}
