// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document Normalizer
//!
//! Drives a raw SMAP document through the entity builders and assembles the
//! [`SmapData`] aggregate.
//!
//! ```text
//! Start -> HeaderParsed -> BodyParsed -> Done
//!   \________________\____________\____> Failed
//! ```
//!
//! Standard mode moves to `Failed` on the first missing-required or
//! structurally invalid entity. Flexible mode reaches `Done` for any JSON
//! object.

use crate::builders::{
    build_advanced_area, build_advanced_curve, build_advanced_line, build_advanced_point,
    build_header, build_line, build_position, build_reflector, HeaderDraft,
};
use crate::coerce::json_kind;
use crate::context::{ParseContext, ROOT};
use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::mode::ParseMode;
use crate::model::{MapCounts, SmapData};
use crate::model_bounds::{scan_map_bounds, Bounds};
use crate::resolver::index_path;
use crate::schema::{document, FieldSpec};
use serde_json::{Map, Value};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Normalizer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Start,
    HeaderParsed,
    BodyParsed,
    Done,
    Failed,
}

/// Result of a parse: the map plus every diagnostic, in encounter order
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParseOutcome {
    pub data: SmapData,
    pub diagnostics: Vec<Diagnostic>,
}

type Builder<T> = fn(&mut ParseContext, &Value, &str) -> Result<T>;

/// Single-document normalizer
///
/// Each call to [`Normalizer::normalize`] starts from a clean diagnostics
/// list.
pub struct Normalizer {
    ctx: ParseContext,
    state: ParseState,
}

impl Normalizer {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            ctx: ParseContext::new(mode),
            state: ParseState::Start,
        }
    }

    #[inline]
    pub fn mode(&self) -> ParseMode {
        self.ctx.mode()
    }

    #[inline]
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Diagnostics of the last document
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.ctx.into_diagnostics().into_vec()
    }

    pub fn normalize(&mut self, doc: &Value) -> Result<SmapData> {
        self.ctx = ParseContext::new(self.ctx.mode());
        self.state = ParseState::Start;

        match self.run(doc) {
            Ok(data) => {
                self.transition(ParseState::Done);
                Ok(data)
            }
            Err(err) => {
                self.transition(ParseState::Failed);
                tracing::debug!(mode = %self.mode(), path = err.path(), error = %err, "SMAP parse failed");
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: ParseState) {
        tracing::trace!(from = ?self.state, to = ?next, "Normalizer state");
        self.state = next;
    }

    fn run(&mut self, doc: &Value) -> Result<SmapData> {
        let root = doc.as_object().ok_or_else(|| {
            Error::malformed_json(format!(
                "document root must be an object, found {}",
                json_kind(doc)
            ))
        })?;

        let draft = self.header(root)?;
        self.transition(ParseState::HeaderParsed);

        let map_directory = self.ctx.opt_text(root, &document::MAP_DIRECTORY, ROOT)?;
        let mut data = SmapData {
            header: HeaderDraft::default().finish(Bounds::empty()),
            map_directory,
            normal_points: self.collect(root, &document::NORMAL_POINTS, build_position)?,
            reflector_points: self.collect(root, &document::REFLECTOR_POINTS, build_reflector)?,
            normal_lines: self.collect(root, &document::NORMAL_LINES, build_line)?,
            advanced_points: self.collect(root, &document::ADVANCED_POINTS, build_advanced_point)?,
            advanced_lines: self.collect(root, &document::ADVANCED_LINES, build_advanced_line)?,
            advanced_curves: self.collect(root, &document::ADVANCED_CURVES, build_advanced_curve)?,
            advanced_areas: self.collect(root, &document::ADVANCED_AREAS, build_advanced_area)?,
            bounds: Bounds::empty(),
            counts: MapCounts::default(),
        };
        self.transition(ParseState::BodyParsed);

        data.bounds = match scan_map_bounds(&data).finish() {
            Some(bounds) => bounds,
            None => {
                self.ctx.info(ROOT, "map has no positions, bounds set to (0, 0) - (0, 0)");
                Bounds::empty()
            }
        };
        data.header = draft.finish(data.bounds);
        data.counts = MapCounts {
            normal_points: data.normal_points.len(),
            reflector_points: data.reflector_points.len(),
            normal_lines: data.normal_lines.len(),
            advanced_points: data.advanced_points.len(),
            advanced_lines: data.advanced_lines.len(),
            advanced_curves: data.advanced_curves.len(),
            advanced_areas: data.advanced_areas.len(),
        };

        tracing::info!(
            name = %data.header.name,
            mode = %self.mode(),
            entities = data.counts.total(),
            diagnostics = self.ctx.diagnostics().len(),
            "Parsed SMAP document"
        );
        Ok(data)
    }

    fn header(&mut self, root: &Map<String, Value>) -> Result<HeaderDraft> {
        let ctx = &mut self.ctx;
        let parsed = ctx
            .required(root, &document::HEADER, ROOT)
            .and_then(|raw| build_header(ctx, raw));
        match parsed {
            Ok(draft) => Ok(draft),
            Err(err) => ctx
                .recover(err, "using default header")
                .map(|_| HeaderDraft::default()),
        }
    }

    /// Build every entity of one top-level section, dropping bad ones in
    /// flexible mode
    fn collect<T>(
        &mut self,
        root: &Map<String, Value>,
        section: &FieldSpec,
        build: Builder<T>,
    ) -> Result<Vec<T>> {
        let items = self.ctx.array(root, section, ROOT)?;
        let mut entities = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match build(&mut self.ctx, item, &index_path(section.name, i)) {
                Ok(entity) => entities.push(entity),
                Err(err) => self.ctx.absorb(err)?,
            }
        }

        tracing::debug!(
            section = section.name,
            parsed = entities.len(),
            dropped = items.len() - entities.len(),
            "Parsed section"
        );
        Ok(entities)
    }
}

/// Parse a document in the given mode
pub fn parse(doc: &Value, mode: ParseMode) -> Result<ParseOutcome> {
    let mut normalizer = Normalizer::new(mode);
    let data = normalizer.normalize(doc)?;
    Ok(ParseOutcome {
        data,
        diagnostics: normalizer.into_diagnostics(),
    })
}

/// Strict parse: canonical keys only, first violation fails
pub fn parse_standard(doc: &Value) -> Result<SmapData> {
    parse(doc, ParseMode::Standard).map(|outcome| outcome.data)
}

/// Tolerant parse: fails only when `doc` is not a JSON object
pub fn parse_flexible(doc: &Value) -> Result<(SmapData, Vec<Diagnostic>)> {
    parse(doc, ParseMode::Flexible).map(|outcome| (outcome.data, outcome.diagnostics))
}

/// Parse SMAP text; syntax errors are [`Error::MalformedJson`]
pub fn parse_str(input: &str, mode: ParseMode) -> Result<ParseOutcome> {
    let doc: Value = serde_json::from_str(input)?;
    parse(&doc, mode)
}
