// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Media handling: source resolution, persistence and public URLs

pub mod resolver;
pub mod store;
pub mod urls;

pub use resolver::{MediaResolver, ResolveError, ResolvedSource, SourceCause};
pub use store::{MediaStore, StoreError, StoredImage, Subcategory};
pub use urls::UrlNormalizer;
