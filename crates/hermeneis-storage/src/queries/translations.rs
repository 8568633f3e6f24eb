// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached translation reads and upserts.

use hermeneis_core::HermeneisError;
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};
use crate::models::{MessageId, ParameterIdentityId, Translation, TranslationId};

fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Returns true if a translation exists for the (message, identity) pair.
pub async fn has_translation(
    db: &Database,
    message: MessageId,
    parameters: ParameterIdentityId,
) -> Result<bool, HermeneisError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS (
                     SELECT 1 FROM message_translation
                     WHERE message_id = ?1 AND translation_parameters_id = ?2)",
                params![message.0, parameters.0],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Insert the translation, or replace text and timestamp of the existing row.
///
/// A single statement, so concurrent upserts to the same pair leave exactly
/// one row holding whichever write landed last.
pub async fn upsert_translation(
    db: &Database,
    message: MessageId,
    parameters: ParameterIdentityId,
    text: &str,
) -> Result<TranslationId, HermeneisError> {
    let text = text.to_string();
    let timestamp = now_timestamp();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "INSERT INTO message_translation (
                     message_id, translation_parameters_id, translation_text, translation_timestamp)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (message_id, translation_parameters_id) DO UPDATE SET
                     translation_text = excluded.translation_text,
                     translation_timestamp = excluded.translation_timestamp
                 RETURNING translation_id",
                params![message.0, parameters.0, text, timestamp],
                |row| Ok(TranslationId(row.get(0)?)),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch the translation for the (message, identity) pair.
pub async fn get_translation(
    db: &Database,
    message: MessageId,
    parameters: ParameterIdentityId,
) -> Result<Option<Translation>, HermeneisError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT translation_id, message_id, translation_parameters_id,
                        translation_text, translation_timestamp
                 FROM message_translation
                 WHERE message_id = ?1 AND translation_parameters_id = ?2",
                params![message.0, parameters.0],
                |row| {
                    Ok(Translation {
                        id: TranslationId(row.get(0)?),
                        message_id: MessageId(row.get(1)?),
                        parameters_id: ParameterIdentityId(row.get(2)?),
                        text: row.get(3)?,
                        timestamp: row.get(4)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Number of translations stored under one identity.
pub async fn count_for_parameters(
    db: &Database,
    parameters: ParameterIdentityId,
) -> Result<u64, HermeneisError> {
    let count: i64 = db
        .connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM message_translation WHERE translation_parameters_id = ?1",
                params![parameters.0],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)?;
    Ok(count.max(0) as u64)
}
