//! Attribute parsing for the Gatherable derive macro.
//!
//! This module parses the `#[gather(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

/// How a field is exposed as a record member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exposure {
    /// Converted with `AsValue`: `#[gather]` or no attribute.
    #[default]
    Value,
    /// Walked into as a nested record: `#[gather(nested)]`.
    Nested,
    /// Visible to paths but unreadable: `#[gather(sealed)]`.
    Sealed,
}

/// Field-level attributes from `#[gather(...)]`.
#[derive(Debug, Clone, Default)]
pub struct GatherAttr {
    /// Leave this field out of the record entirely.
    pub skip: bool,
    /// Member name used in paths (default: field name).
    pub rename: Option<String>,
    /// How the member is exposed.
    pub exposure: Exposure,
}

impl GatherAttr {
    fn expose(&mut self, exposure: Exposure, span: Span) -> Result<()> {
        if self.exposure != Exposure::Value && self.exposure != exposure {
            return Err(Error::new(span, "nested and sealed cannot be combined"));
        }
        self.exposure = exposure;
        Ok(())
    }
}

impl Parse for GatherAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = GatherAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("nested") => attr.expose(Exposure::Nested, p.span())?,
                Meta::Path(p) if p.is_ident("sealed") => attr.expose(Exposure::Sealed, p.span())?,

                // rename = "member_name"
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        if s.value().is_empty() || s.value().contains('.') {
                            return Err(Error::new(
                                s.span(),
                                "rename must be a non-empty name without '.'",
                            ));
                        }
                        attr.rename = Some(s.value());
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown gather attribute. Expected: skip, nested, sealed, or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[gather(...)]` attributes from a field's attributes.
///
/// A bare `#[gather]` is accepted and means the defaults.
pub fn parse_gather_attrs(attrs: &[Attribute]) -> Result<GatherAttr> {
    for attr in attrs {
        if attr.path().is_ident("gather") {
            if let Meta::Path(_) = attr.meta {
                return Ok(GatherAttr::default());
            }
            return attr.parse_args::<GatherAttr>();
        }
    }
    Ok(GatherAttr::default())
}
