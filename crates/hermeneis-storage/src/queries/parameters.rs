// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation parameter identity registration.
//!
//! A parameter identity is the tuple (tool name, tool commit, model, config
//! digest, config text). Registration is idempotent: the same tuple always
//! resolves to the same row.

use hermeneis_core::HermeneisError;
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};
use crate::models::{NewParameterIdentity, ParameterIdentity, ParameterIdentityId};

/// Stored value for an unresolved tool commit. NULL would defeat the UNIQUE
/// constraint, since SQLite treats every NULL as distinct.
const NO_COMMIT: &str = "";

/// Return the identity for `params`, inserting it if the tuple is new.
///
/// Any failure other than the uniqueness conflict (which is absorbed) is
/// reported as [`HermeneisError::ConfigurationPersistence`].
pub async fn get_or_create(
    db: &Database,
    params: &NewParameterIdentity,
) -> Result<ParameterIdentity, HermeneisError> {
    let p = params.clone();
    let id = db
        .connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            let commit = p.tool_commit.as_deref().unwrap_or(NO_COMMIT);
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO translation_parameters (
                     translation_tool_name, translation_tool_commit, translation_model,
                     translation_config_sha256, translation_config)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (translation_tool_name, translation_tool_commit, translation_model,
                              translation_config_sha256, translation_config)
                 DO NOTHING",
                params![p.tool_name, commit, p.model, p.config_sha256, p.config_text],
            )?;
            let id = tx.query_row(
                "SELECT translation_parameters_id FROM translation_parameters
                 WHERE translation_tool_name = ?1
                   AND translation_tool_commit = ?2
                   AND translation_model = ?3
                   AND translation_config_sha256 = ?4
                   AND translation_config = ?5",
                params![p.tool_name, commit, p.model, p.config_sha256, p.config_text],
                |row| row.get(0),
            )?;
            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(|e| HermeneisError::ConfigurationPersistence {
            source: Box::new(e),
        })?;

    Ok(ParameterIdentity {
        id: ParameterIdentityId(id),
        tool_name: params.tool_name.clone(),
        tool_commit: params.tool_commit.clone(),
        model: params.model.clone(),
        config_sha256: params.config_sha256.clone(),
        config_text: params.config_text.clone(),
    })
}

/// Fetch a registered identity by id.
pub async fn get_parameters(
    db: &Database,
    id: ParameterIdentityId,
) -> Result<Option<ParameterIdentity>, HermeneisError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT translation_parameters_id, translation_tool_name, translation_tool_commit,
                        translation_model, translation_config_sha256, translation_config
                 FROM translation_parameters WHERE translation_parameters_id = ?1",
                params![id.0],
                |row| {
                    let commit: Option<String> = row.get(2)?;
                    Ok(ParameterIdentity {
                        id: ParameterIdentityId(row.get(0)?),
                        tool_name: row.get(1)?,
                        tool_commit: commit.filter(|c| c != NO_COMMIT),
                        model: row.get(3)?,
                        config_sha256: row.get(4)?,
                        config_text: row.get(5)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn tuple(commit: Option<&str>, digest: &str) -> NewParameterIdentity {
        NewParameterIdentity {
            tool_name: "hermeneis".to_string(),
            tool_commit: commit.map(str::to_string),
            model: "gpt-3.5-turbo".to_string(),
            config_sha256: digest.to_string(),
            config_text: format!("personality: {digest}"),
        }
    }

    async fn row_count(db: &Database) -> i64 {
        db.connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM translation_parameters", [], |row| {
                    row.get(0)
                })
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn same_tuple_twice_yields_same_id_and_one_row() {
        let (db, _dir) = setup_db().await;
        let params = tuple(Some("abc123"), "d1");

        let first = get_or_create(&db, &params).await.unwrap();
        let second = get_or_create(&db, &params).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(row_count(&db).await, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_commit_is_still_deduplicated() {
        let (db, _dir) = setup_db().await;
        let params = tuple(None, "d1");

        let first = get_or_create(&db, &params).await.unwrap();
        let second = get_or_create(&db, &params).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(row_count(&db).await, 1);

        let stored = get_parameters(&db, first.id).await.unwrap().unwrap();
        assert_eq!(stored.tool_commit, None);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn any_differing_field_yields_new_identity() {
        let (db, _dir) = setup_db().await;
        let base = get_or_create(&db, &tuple(Some("abc"), "d1")).await.unwrap();
        let new_digest = get_or_create(&db, &tuple(Some("abc"), "d2")).await.unwrap();
        let new_commit = get_or_create(&db, &tuple(Some("def"), "d1")).await.unwrap();

        let mut other_model = tuple(Some("abc"), "d1");
        other_model.model = "gpt-4".to_string();
        let new_model = get_or_create(&db, &other_model).await.unwrap();

        let ids = [base.id, new_digest.id, new_commit.id, new_model.id];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(row_count(&db).await, 4);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_parameters_round_trips_fields() {
        let (db, _dir) = setup_db().await;
        let params = tuple(Some("abc123"), "d1");
        let created = get_or_create(&db, &params).await.unwrap();

        let stored = get_parameters(&db, created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);
        assert!(get_parameters(&db, ParameterIdentityId(999)).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_table_is_configuration_persistence_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("bare.db");
        let db = Database::open_with_schema(db_path.to_str().unwrap(), "", false)
            .await
            .unwrap();

        let err = get_or_create(&db, &tuple(None, "d1")).await.unwrap_err();
        assert!(matches!(err, HermeneisError::ConfigurationPersistence { .. }));
        db.close().await.unwrap();
    }
}
