// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message reads.

use hermeneis_core::HermeneisError;
use rusqlite::params;

use crate::database::{map_tr_err, Database};
use crate::models::{ChannelId, Message, MessageId};

/// Insert a message with an explicit id.
///
/// Used to seed stores; the translation pipeline never writes messages.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<(), HermeneisError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (message_id, channel_id, message_text)
                 VALUES (?1, ?2, ?3)",
                params![msg.id.0, msg.channel_id.0, msg.text],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get every message of a channel, ordered by message id.
///
/// A NULL text column reads back as the empty string.
pub async fn get_messages_for_channel(
    db: &Database,
    channel: ChannelId,
) -> Result<Vec<Message>, HermeneisError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT message_id, channel_id, COALESCE(message_text, '')
                 FROM messages WHERE channel_id = ?1
                 ORDER BY message_id ASC",
            )?;
            let rows = stmt.query_map(params![channel.0], |row| {
                Ok(Message {
                    id: MessageId(row.get(0)?),
                    channel_id: ChannelId(row.get(1)?),
                    text: row.get(2)?,
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}
