// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel lookups.
//!
//! Channels are created by whatever ingests messages; Hermeneis only reads
//! them. `insert_channel` exists for seeding stores in tests and tooling.

use hermeneis_core::HermeneisError;
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};
use crate::models::{Channel, ChannelId};

/// Look up a channel by its unique name.
pub async fn find_channel_by_name(
    db: &Database,
    name: &str,
) -> Result<Option<Channel>, HermeneisError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT channel_id, channel_name FROM channels WHERE channel_name = ?1",
                params![name],
                |row| {
                    Ok(Channel {
                        id: ChannelId(row.get(0)?),
                        name: row.get(1)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Returns true if at least one message belongs to the channel.
pub async fn channel_has_messages(db: &Database, channel: ChannelId) -> Result<bool, HermeneisError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM messages WHERE channel_id = ?1)",
                params![channel.0],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a channel and return its assigned id.
pub async fn insert_channel(db: &Database, name: &str) -> Result<ChannelId, HermeneisError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO channels (channel_name) VALUES (?1)",
                params![name],
            )?;
            Ok(ChannelId(conn.last_insert_rowid()))
        })
        .await
        .map_err(map_tr_err)
}
