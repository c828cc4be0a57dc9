use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derives serde-backed `Display` and `FromStr` for a fieldless enum, plus an
/// `ALL` constant listing its variants in declaration order.
///
/// The string form of each variant is whatever its `Serialize` impl produces,
/// so `#[serde(rename_all = "...")]` and `#[serde(rename = "...")]` apply.
#[proc_macro_derive(Str)]
pub fn str_macro_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let name = &ast.ident;

    let data = match &ast.data {
        Data::Enum(data) => data,
        _ => return quote! {compile_error!("Str supports only enums");}.into(),
    };

    if data
        .variants
        .iter()
        .any(|variant| !matches!(variant.fields, Fields::Unit))
    {
        return quote! {compile_error!("Str supports only fieldless variants");}.into();
    }

    let variants = data.variants.iter().map(|variant| &variant.ident);
    let count = data.variants.len();

    let gen = quote! {
        impl #name {
            pub const ALL: [#name; #count] = [#(#name::#variants),*];
        }

        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                serde::Serialize::serialize(self, f)
            }
        }

        impl std::str::FromStr for #name {
            type Err = serde::de::value::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                use serde::de::IntoDeserializer;

                <Self as serde::Deserialize>::deserialize(s.into_deserializer())
            }
        }
    };

    gen.into()
}
