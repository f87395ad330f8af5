// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

/// Operators and the host contract they are driven through
pub mod operator;
/// Processing time sources
pub mod time;
