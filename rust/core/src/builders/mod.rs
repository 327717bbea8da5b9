// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity Builders
//!
//! One builder per entity kind. A builder turns one raw JSON value into a
//! validated entity or an [`Error`](crate::Error) describing why it could not;
//! whether that error drops the entity or aborts the document is decided by
//! the normalizer.

pub(crate) mod advanced;
pub(crate) mod header;
pub(crate) mod line;
pub(crate) mod position;
pub(crate) mod property;

pub(crate) use advanced::{
    build_advanced_area, build_advanced_curve, build_advanced_line, build_advanced_point,
};
pub(crate) use header::{build_header, HeaderDraft};
pub(crate) use line::build_line;
pub(crate) use position::{build_position, build_reflector};
