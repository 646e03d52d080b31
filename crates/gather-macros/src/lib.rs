//! Proc macros for gather.
//!
//! # Derive Macros
//!
//! - [`Gatherable`] - Expose a struct's fields as record members for queries
//!   and aggregation

mod gatherable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Gatherable` trait for structs with named fields.
///
/// Every field becomes a member under its own name, converted to a value
/// with `gather::AsValue`. Attribute paths can then reach it, and through
/// `nested` fields, the members of the records they hold.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Leave the field out; paths naming it do not resolve |
/// | `rename = "..."` | Use a custom member name |
/// | `nested` | The field is itself `Gatherable` (possibly an `Option`); paths walk into it |
/// | `sealed` | The member resolves but reading it is an access error |
///
/// # Generated Code
///
/// 1. A `pub const` per member holding its name, in SCREAMING_SNAKE_CASE
///    (`priority` becomes `Task::PRIORITY`)
/// 2. An implementation of `Gatherable::member()`
///
/// # Example
///
/// ```ignore
/// use gather::{Criterion, Gatherable, Query};
///
/// #[derive(Gatherable)]
/// struct Owner {
///     name: String,
/// }
///
/// #[derive(Gatherable)]
/// struct Task {
///     title: String,
///     priority: u8,
///     #[gather(nested)]
///     owner: Option<Owner>,
///     #[gather(rename = "labels")]
///     tags: Vec<String>,
///     #[gather(skip)]
///     internal_id: u64,
/// }
///
/// let query = Query::new()
///     .or(Criterion::greater_than_or_equals(Task::PRIORITY, 3))
///     .and(Criterion::equals("owner.name", "ada"));
/// ```
#[proc_macro_derive(Gatherable, attributes(gather))]
pub fn gatherable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    gatherable::gatherable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
