//! Implementation of the `#[derive(Gatherable)]` macro.
//!
//! This macro generates an implementation of the `Gatherable` trait and
//! member name constants for building criteria without string typos.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_gather_attrs, Exposure};

/// Main implementation of the Gatherable derive macro.
pub fn gatherable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => return Ok(unit_impl(&input)),
            Fields::Unnamed(_) => {
                return Err(Error::new(
                    input.span(),
                    "Gatherable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Gatherable can only be derived for structs",
            ))
        }
    };

    let mut member_arms: Vec<TokenStream> = Vec::new();
    let mut member_constants: Vec<TokenStream> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_gather_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let member_name = attrs
            .rename
            .unwrap_or_else(|| field_name.to_string().trim_start_matches("r#").to_string());

        if seen.contains(&member_name) {
            return Err(Error::new(
                field.span(),
                format!("duplicate gather member name '{member_name}'"),
            ));
        }
        seen.push(member_name.clone());

        let const_name = format_ident!("{}", to_screaming_snake_case(&member_name));
        member_constants.push(quote! {
            /// Member name constant for building criteria.
            pub const #const_name: &'static str = #member_name;
        });

        let member_expr = match attrs.exposure {
            Exposure::Value => quote! { ::gather::Member::of(&self.#field_name) },
            Exposure::Nested => quote! { ::gather::Member::nested(&self.#field_name) },
            Exposure::Sealed => quote! { ::gather::Member::Sealed },
        };

        member_arms.push(quote! {
            #member_name => #member_expr,
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#member_constants)*
        }

        impl #impl_generics ::gather::Gatherable for #struct_name #ty_generics #where_clause {
            fn member(&self, name: &str) -> ::gather::Member<'_> {
                match name {
                    #(#member_arms)*
                    _ => ::gather::Member::Absent,
                }
            }
        }
    };

    Ok(expanded)
}

/// A unit struct is a record without members.
fn unit_impl(input: &DeriveInput) -> TokenStream {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::gather::Gatherable for #struct_name #ty_generics #where_clause {
            fn member(&self, _name: &str) -> ::gather::Member<'_> {
                ::gather::Member::Absent
            }
        }
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: DeriveInput) -> String {
        gatherable_derive_impl(input).unwrap().to_string()
    }

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("created_at"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("createdAt"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("my-field"), "MY_FIELD");
        assert_eq!(to_screaming_snake_case("XMLParser"), "XMLPARSER");
    }

    #[test]
    fn test_members_by_exposure() {
        let tokens = expand(syn::parse_quote! {
            struct Order {
                id: u64,
                #[gather(nested)]
                customer: Customer,
                #[gather(sealed)]
                card: String,
                #[gather(skip)]
                cache: Vec<u8>,
            }
        });

        assert!(tokens.contains("\"id\" => :: gather :: Member :: of (& self . id)"));
        assert!(tokens.contains("\"customer\" => :: gather :: Member :: nested (& self . customer)"));
        assert!(tokens.contains("\"card\" => :: gather :: Member :: Sealed"));
        assert!(!tokens.contains("cache"));
        assert!(tokens.contains("pub const CUSTOMER"));
    }

    #[test]
    fn test_rename_changes_member_and_constant() {
        let tokens = expand(syn::parse_quote! {
            struct Order {
                #[gather(rename = "total_cents")]
                total: u64,
            }
        });

        assert!(tokens.contains("\"total_cents\" => :: gather :: Member :: of (& self . total)"));
        assert!(tokens.contains("pub const TOTAL_CENTS"));
    }

    #[test]
    fn test_generics_are_forwarded() {
        let tokens = expand(syn::parse_quote! {
            struct Wrapper<T: Clone> {
                inner: T,
            }
        });

        assert!(tokens.contains("impl < T : Clone > :: gather :: Gatherable for Wrapper < T >"));
    }

    #[test]
    fn test_unit_struct_has_no_members() {
        let tokens = expand(syn::parse_quote! { struct Marker; });
        assert!(tokens.contains(":: gather :: Member :: Absent"));
        assert!(!tokens.contains("pub const"));
    }

    #[test]
    fn test_rejects_tuple_structs_and_enums() {
        assert!(gatherable_derive_impl(syn::parse_quote! { struct Pair(u8, u8); }).is_err());
        assert!(gatherable_derive_impl(syn::parse_quote! { enum Kind { A, B } }).is_err());
    }

    #[test]
    fn test_rejects_duplicate_member_names() {
        let result = gatherable_derive_impl(syn::parse_quote! {
            struct Clash {
                name: String,
                #[gather(rename = "name")]
                label: String,
            }
        });
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }
}
