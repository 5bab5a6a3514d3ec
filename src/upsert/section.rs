//! Page sections (`business_sections`): insert without `id`, rewrite with one.

use serde_json::{Map, Value};

use super::{EntityKind, EntityWriter, Intent};
use crate::config::KeyType;
use crate::error::{Result, WriteError};
use crate::executor::{SqlParam, Statement};
use crate::fields::Fields;

pub struct Section;

/// The seven validated, non-identifier fields.
struct SectionInput<'a> {
    company_id: String,
    page: String,
    order_position: i64,
    component: String,
    component_variant_id: String,
    content: &'a Map<String, Value>,
    metadata: &'a Map<String, Value>,
}

impl<'a> SectionInput<'a> {
    fn parse(fields: &'a Fields) -> Result<Self> {
        Ok(Self {
            company_id: fields.required_str("company_id")?,
            page: fields.required_str("page")?,
            order_position: fields.required_integer("order_position")?,
            component: fields.required_str("component")?,
            component_variant_id: fields.required_str("component_variant_id")?,
            content: fields.required_object("content")?,
            metadata: fields.required_object("metadata")?,
        })
    }
}

impl EntityWriter for Section {
    fn kind(&self) -> EntityKind {
        EntityKind::Section
    }

    fn intent(&self, fields: &Fields) -> Result<Intent> {
        Ok(match fields.identifier("id")? {
            None => Intent::Create,
            Some(_) => Intent::FullUpdate,
        })
    }

    fn build(&self, intent: Intent, fields: &Fields, keys: KeyType) -> Result<Statement> {
        let input = SectionInput::parse(fields)?;

        match intent {
            Intent::Create => {
                let sql = format!(
                    "INSERT INTO business_sections (company_id, page, order_position, component, component_variant_id, content, metadata)
                VALUES ({}, $2, $3, $4, {}, $6::jsonb, $7::jsonb)
                RETURNING *",
                    keys.placeholder(1),
                    keys.placeholder(5)
                );
                Ok(Statement::new(
                    sql,
                    vec![
                        SqlParam::Text(input.company_id),
                        SqlParam::Text(input.page),
                        SqlParam::Int(input.order_position),
                        SqlParam::Text(input.component),
                        SqlParam::Text(input.component_variant_id),
                        SqlParam::json(input.content),
                        SqlParam::json(input.metadata),
                    ],
                ))
            }
            Intent::FullUpdate => {
                let id = fields
                    .identifier("id")?
                    .ok_or_else(|| WriteError::validation("'id' is required to update a section"))?;
                let sql = format!(
                    "UPDATE business_sections
                SET page = $1, order_position = $2, component = $3, component_variant_id = {},
                    content = $5::jsonb, metadata = $6::jsonb
                WHERE id = {} AND company_id = {}
                RETURNING *",
                    keys.placeholder(4),
                    keys.placeholder(7),
                    keys.placeholder(8)
                );
                Ok(Statement::new(
                    sql,
                    vec![
                        SqlParam::Text(input.page),
                        SqlParam::Int(input.order_position),
                        SqlParam::Text(input.component),
                        SqlParam::Text(input.component_variant_id),
                        SqlParam::json(input.content),
                        SqlParam::json(input.metadata),
                        SqlParam::Text(id),
                        SqlParam::Text(input.company_id),
                    ],
                ))
            }
            Intent::PartialUpdate => Err(WriteError::validation(
                "business sections have no partial update",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> serde_json::Value {
        json!({
            "company_id": "c1",
            "page": "home",
            "order_position": 0,
            "component": "hero",
            "component_variant_id": "v-2",
            "content": {"title": "Welcome"},
            "metadata": {"theme": "dark"},
        })
    }

    fn fields(value: serde_json::Value) -> Fields {
        Fields::from_value(value).unwrap()
    }

    #[test]
    fn insert_accepts_position_zero() {
        let (intent, stmt) = Section.plan(&fields(base()), KeyType::Uuid).unwrap();
        assert_eq!(intent, Intent::Create);
        assert!(stmt.sql.starts_with("INSERT INTO business_sections"));
        assert_eq!(stmt.params.len(), 7);
        assert_eq!(stmt.params[2], SqlParam::Int(0));
        assert_eq!(stmt.params[5], SqlParam::Json(r#"{"title":"Welcome"}"#.into()));
        assert_eq!(stmt.params[6], SqlParam::Json(r#"{"theme":"dark"}"#.into()));
    }

    #[test]
    fn update_targets_sections_table_scoped_to_company() {
        let mut value = base();
        value["id"] = json!("s-9");
        let (intent, stmt) = Section.plan(&fields(value), KeyType::Uuid).unwrap();
        assert_eq!(intent, Intent::FullUpdate);
        assert!(stmt.sql.starts_with("UPDATE business_sections"));
        assert!(stmt.sql.contains("WHERE id = $7::uuid AND company_id = $8::uuid"));
        assert_eq!(stmt.params.len(), 8);
        assert_eq!(stmt.params[6], SqlParam::text("s-9"));
        assert_eq!(stmt.params[7], SqlParam::text("c1"));
    }

    #[test]
    fn update_serializes_json_fields() {
        let mut value = base();
        value["id"] = json!("s-9");
        let (_, stmt) = Section.plan(&fields(value), KeyType::Uuid).unwrap();
        assert!(matches!(stmt.params[4], SqlParam::Json(_)));
        assert!(matches!(stmt.params[5], SqlParam::Json(_)));
    }

    #[test]
    fn every_field_is_checked_on_update_too() {
        let mut value = base();
        value["id"] = json!("s-9");
        value["metadata"] = json!(null);
        let err = Section.plan(&fields(value), KeyType::Uuid).unwrap_err();
        assert!(err.to_string().contains("'metadata'"));
    }

    #[test]
    fn order_position_must_be_numeric() {
        let mut value = base();
        value["order_position"] = json!("1");
        let err = Section.plan(&fields(value), KeyType::Uuid).unwrap_err();
        assert!(err.to_string().contains("'order_position'"));
    }

    #[test]
    fn fractional_order_position_is_rejected() {
        let mut value = base();
        value["order_position"] = json!(1.5);
        let err = Section.plan(&fields(value), KeyType::Uuid).unwrap_err();
        assert!(matches!(err, WriteError::Validation(_)));
        assert!(err.to_string().contains("'order_position'"));
    }

    #[test]
    fn blank_component_is_rejected() {
        let mut value = base();
        value["component"] = json!("   ");
        assert!(Section.plan(&fields(value), KeyType::Uuid).is_err());
    }
}
