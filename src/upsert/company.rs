//! Company registration (`companies`). Always an insert; an explicit `id`
//! is written through, otherwise the store generates one.

use super::{EntityKind, EntityWriter, Intent};
use crate::config::KeyType;
use crate::error::{Result, WriteError};
use crate::executor::{SqlParam, Statement};
use crate::fields::Fields;

pub struct Company;

impl EntityWriter for Company {
    fn kind(&self) -> EntityKind {
        EntityKind::Company
    }

    fn intent(&self, _fields: &Fields) -> Result<Intent> {
        Ok(Intent::Create)
    }

    fn build(&self, intent: Intent, fields: &Fields, keys: KeyType) -> Result<Statement> {
        if intent != Intent::Create {
            return Err(WriteError::validation(
                "companies can only be registered, not updated",
            ));
        }

        let fantasy_name = fields.required_str("fantasy_name")?;
        let legal_info = fields.required_object("legal_info")?;
        let url_domain = fields.required_str("url_domain")?;

        let statement = match fields.identifier("id")? {
            None => Statement::new(
                "INSERT INTO companies (fantasy_name, legal_info, url_domain)
            VALUES ($1, $2::jsonb, $3)
            RETURNING id",
                vec![
                    SqlParam::Text(fantasy_name),
                    SqlParam::json(legal_info),
                    SqlParam::Text(url_domain),
                ],
            ),
            Some(id) => Statement::new(
                format!(
                    "INSERT INTO companies (id, fantasy_name, legal_info, url_domain)
            VALUES ({}, $2, $3::jsonb, $4)
            RETURNING id",
                    keys.placeholder(1)
                ),
                vec![
                    SqlParam::Text(id),
                    SqlParam::Text(fantasy_name),
                    SqlParam::json(legal_info),
                    SqlParam::Text(url_domain),
                ],
            ),
        };
        Ok(statement)
    }
}
