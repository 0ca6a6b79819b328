// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Participant address extraction.

use alloy_primitives::Address;

use crate::blocks::BlockRecord;

/// Yields the participant addresses of one block.
///
/// Transactions are walked in block order; each contributes its sender,
/// then its recipient when present (contract creations have none). No
/// deduplication: an address appears once per participation.
pub fn participant_addresses(block: &BlockRecord) -> impl Iterator<Item = Address> + '_ {
    block
        .transactions
        .iter()
        .flat_map(|tx| std::iter::once(tx.from).chain(tx.to))
}
