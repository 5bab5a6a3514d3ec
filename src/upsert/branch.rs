//! Branch writes (`business_branches`).
//!
//! - no `id` → insert
//! - `id`, no `name`, no `address` key → flip the headquarters flag only
//! - `id` with `name` or `address` → rewrite the branch, scoped to its company

use super::{EntityKind, EntityWriter, Intent};
use crate::config::KeyType;
use crate::error::{Result, WriteError};
use crate::executor::{SqlParam, Statement};
use crate::fields::Fields;

pub struct Branch;

fn required_id(fields: &Fields) -> Result<String> {
    fields
        .identifier("id")?
        .ok_or_else(|| WriteError::validation("'id' is required and must be a string"))
}

impl EntityWriter for Branch {
    fn kind(&self) -> EntityKind {
        EntityKind::Branch
    }

    fn intent(&self, fields: &Fields) -> Result<Intent> {
        if fields.identifier("id")?.is_none() {
            return Ok(Intent::Create);
        }
        // A missing `address` key is the unset marker; `{}` or null still count as supplied.
        if !fields.is_set("name") && !fields.contains("address") {
            Ok(Intent::PartialUpdate)
        } else {
            Ok(Intent::FullUpdate)
        }
    }

    fn build(&self, intent: Intent, fields: &Fields, keys: KeyType) -> Result<Statement> {
        match intent {
            Intent::Create => {
                let company_id = fields.required_str("company_id")?;
                let name = fields.required_str("name")?;
                let is_hq = fields.required_true("is_hq")?;
                let address = fields.required_object("address")?;
                let is_visible = fields.optional_bool("is_visible")?;

                let sql = format!(
                    "INSERT INTO business_branches (company_id, name, is_hq, is_visible, address)
                VALUES ({}, $2, $3, $4, $5::jsonb)
                RETURNING id, company_id, is_hq, is_visible, address",
                    keys.placeholder(1)
                );
                Ok(Statement::new(
                    sql,
                    vec![
                        SqlParam::Text(company_id),
                        SqlParam::Text(name),
                        SqlParam::Bool(is_hq),
                        SqlParam::Bool(is_visible),
                        SqlParam::json(address),
                    ],
                ))
            }
            Intent::PartialUpdate => {
                let is_hq = fields.required_true("is_hq")?;
                let id = required_id(fields)?;

                let sql = format!(
                    "UPDATE business_branches
                SET is_hq = $1
                WHERE id = {}
                RETURNING *",
                    keys.placeholder(2)
                );
                Ok(Statement::new(
                    sql,
                    vec![SqlParam::Bool(is_hq), SqlParam::Text(id)],
                ))
            }
            Intent::FullUpdate => {
                let company_id = fields.required_str("company_id")?;
                let id = required_id(fields)?;
                let name = fields.required_str("name")?;
                let is_hq = fields.required_true("is_hq")?;
                let is_visible = fields.required_true("is_visible")?;
                let address = fields.required_object("address")?;

                let sql = format!(
                    "UPDATE business_branches
                SET name = $1, is_hq = $2, is_visible = $3, address = $4::jsonb
                WHERE id = {} AND company_id = {}
                RETURNING *",
                    keys.placeholder(5),
                    keys.placeholder(6)
                );
                Ok(Statement::new(
                    sql,
                    vec![
                        SqlParam::Text(name),
                        SqlParam::Bool(is_hq),
                        SqlParam::Bool(is_visible),
                        SqlParam::json(address),
                        SqlParam::Text(id),
                        SqlParam::Text(company_id),
                    ],
                ))
            }
        }
    }
}
