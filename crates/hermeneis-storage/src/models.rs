// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types live in `hermeneis-core::types` so they can cross
//! adapter trait boundaries. This module re-exports them for use inside the
//! storage crate.

pub use hermeneis_core::types::{
    Channel, ChannelId, Message, MessageId, NewParameterIdentity, ParameterIdentity,
    ParameterIdentityId, Translation, TranslationId,
};
