// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line builder

use super::position::build_position;
use crate::context::{expect_object, ParseContext};
use crate::error::Result;
use crate::model::MapLine;
use crate::resolver::field_path;
use crate::schema::line;
use serde_json::Value;

/// Build a `{startPos, endPos}` segment
pub(crate) fn build_line(ctx: &mut ParseContext, raw: &Value, path: &str) -> Result<MapLine> {
    let obj = expect_object(raw, "line", path)?;

    let start = ctx.required(obj, &line::START, path)?;
    let start = build_position(ctx, start, &field_path(path, line::START.name))?;
    let end = ctx.required(obj, &line::END, path)?;
    let end = build_position(ctx, end, &field_path(path, line::END.name))?;

    Ok(MapLine { start, end })
}
