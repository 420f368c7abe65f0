use std::collections::HashSet;

use knuffel::ast::{Literal, TypeName};
use knuffel::decode::{Context, Kind};
use knuffel::errors::DecodeError;
use knuffel::span::Spanned;
use knuffel::traits::ErrorSpan;

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct WorkspaceConfig {
    #[knuffel(argument)]
    pub name: WorkspaceName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceName(pub String);

/// Arrangement of the workspace grid.
///
/// At most one of `rows` and `columns` is authoritative. When both are set, `rows` wins.
#[derive(knuffel::Decode, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceLayout {
    #[knuffel(child, unwrap(argument))]
    pub rows: Option<u32>,
    #[knuffel(child, unwrap(argument))]
    pub columns: Option<u32>,
    #[knuffel(child, unwrap(argument), default)]
    pub starting_corner: StartingCorner,
    /// Fill the grid column by column instead of row by row.
    #[knuffel(child)]
    pub vertical: bool,
}

#[derive(knuffel::DecodeScalar, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StartingCorner {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Case-folded names of the workspaces decoded so far in one config.
#[derive(Debug, Default, Clone)]
struct SeenWorkspaceNames(HashSet<String>);

impl<S: ErrorSpan> knuffel::DecodeScalar<S> for WorkspaceName {
    fn type_check(type_name: &Option<Spanned<TypeName, S>>, ctx: &mut Context<S>) {
        if let Some(type_name) = type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "workspace names take no type name",
            ));
        }
    }

    fn raw_decode(val: &Spanned<Literal, S>, ctx: &mut Context<S>) -> Result<Self, DecodeError<S>> {
        let Literal::String(name) = &**val else {
            return Err(DecodeError::scalar_kind(Kind::String, val));
        };

        if name.trim().is_empty() {
            return Err(DecodeError::conversion(val, "workspace name must not be blank"));
        }

        let mut seen = ctx.get::<SeenWorkspaceNames>().cloned().unwrap_or_default();
        if !seen.0.insert(name.to_lowercase()) {
            ctx.emit_error(DecodeError::conversion(
                val,
                format!("workspace name {name:?} is used more than once"),
            ));
        }
        ctx.set(seen);

        Ok(Self(name.to_string()))
    }
}
