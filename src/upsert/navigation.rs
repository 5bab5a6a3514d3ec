//! Navigation entries (`business_navigation_content`).

use serde_json::{Map, Value};

use super::{EntityKind, EntityWriter, Intent};
use crate::config::KeyType;
use crate::error::{Result, WriteError};
use crate::executor::{SqlParam, Statement};
use crate::fields::Fields;

pub struct Navigation;

struct NavigationInput<'a> {
    company_id: String,
    label: String,
    link: String,
    tab: String,
    action: String,
    order_position: i64,
    icon: &'a Map<String, Value>,
}

impl<'a> NavigationInput<'a> {
    fn parse(fields: &'a Fields) -> Result<Self> {
        Ok(Self {
            company_id: fields.required_str("company_id")?,
            label: fields.required_str("label")?,
            link: fields.required_str("link")?,
            tab: fields.required_str("tab")?,
            action: fields.required_str("action")?,
            // Position zero is refused here, unlike sections.
            order_position: fields.required_nonzero_integer("order_position")?,
            icon: fields.required_object("icon")?,
        })
    }
}

impl EntityWriter for Navigation {
    fn kind(&self) -> EntityKind {
        EntityKind::Navigation
    }

    fn intent(&self, fields: &Fields) -> Result<Intent> {
        Ok(match fields.identifier("id")? {
            None => Intent::Create,
            Some(_) => Intent::FullUpdate,
        })
    }

    fn build(&self, intent: Intent, fields: &Fields, keys: KeyType) -> Result<Statement> {
        let input = NavigationInput::parse(fields)?;

        match intent {
            Intent::Create => {
                let sql = format!(
                    "INSERT INTO business_navigation_content (company_id, label, link, tab, action, order_position, icon)
                VALUES ({}, $2, $3, $4, $5, $6, $7::jsonb)
                RETURNING *",
                    keys.placeholder(1)
                );
                Ok(Statement::new(
                    sql,
                    vec![
                        SqlParam::Text(input.company_id),
                        SqlParam::Text(input.label),
                        SqlParam::Text(input.link),
                        SqlParam::Text(input.tab),
                        SqlParam::Text(input.action),
                        SqlParam::Int(input.order_position),
                        SqlParam::json(input.icon),
                    ],
                ))
            }
            Intent::FullUpdate => {
                let id = fields.identifier("id")?.ok_or_else(|| {
                    WriteError::validation("'id' is required to update a navigation entry")
                })?;
                let sql = format!(
                    "UPDATE business_navigation_content
                SET label = $1, link = $2, tab = $3, action = $4, order_position = $5, icon = $6::jsonb
                WHERE id = {} AND company_id = {}
                RETURNING *",
                    keys.placeholder(7),
                    keys.placeholder(8)
                );
                Ok(Statement::new(
                    sql,
                    vec![
                        SqlParam::Text(input.label),
                        SqlParam::Text(input.link),
                        SqlParam::Text(input.tab),
                        SqlParam::Text(input.action),
                        SqlParam::Int(input.order_position),
                        SqlParam::json(input.icon),
                        SqlParam::Text(id),
                        SqlParam::Text(input.company_id),
                    ],
                ))
            }
            Intent::PartialUpdate => Err(WriteError::validation(
                "navigation entries have no partial update",
            )),
        }
    }
}
