use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned, ToTokens};
use syn::{parse_macro_input, Data, DataStruct, DeriveInput, Field, Type};

/// Declares the struct's field types, in order, as an alternative set.
///
/// ```ignore
/// #[derive(Alternatives)]
/// struct IntOrString(i32, String);
///
/// let v = Variant::<IntOrString>::with(5_i32);
/// ```
#[proc_macro_derive(Alternatives)]
pub fn alternatives(input: TokenStream) -> TokenStream {
    let input: DeriveInput = parse_macro_input!(input);
    let span = input.ident.span();
    match alternatives_inner(input) {
        Ok(tokens) => tokens,
        Err(e) => match e {
            AlternativesError::NotAStruct => quote_spanned! {
                span => compile_error!("Alternatives only applies to structs");
            },
            AlternativesError::NoFields => quote_spanned! {
                span => compile_error!("Alternatives needs at least one field to take a type from");
            },
            AlternativesError::Syn(e) => e.into_compile_error(),
        },
    }
    .into()
}

fn alternatives_inner(input: DeriveInput) -> Result<TokenStream2, AlternativesError> {
    let DeriveInput {
        data,
        ident,
        generics,
        vis: _,
        attrs: _,
    } = input;

    match data {
        Data::Struct(DataStruct { fields, .. }) => {
            let types: Vec<&Type> = fields.iter().map(|Field { ty, .. }| ty).collect();
            if types.is_empty() {
                return Err(AlternativesError::NoFields);
            }
            reject_duplicates(&types)?;

            let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
            Ok(quote! {
                impl #impl_generics ::tagged_variant::Alternatives for #ident #ty_generics
                #where_clause
                {
                    type List = ::tagged_variant::alternatives![#(#types),*];
                }
            })
        }

        Data::Enum(_) | Data::Union(_) => Err(AlternativesError::NotAStruct),
    }
}

/// Alternatives are looked up by type, so each may only be listed once.
fn reject_duplicates(types: &[&Type]) -> Result<(), AlternativesError> {
    let mut seen: Vec<String> = Vec::with_capacity(types.len());
    for ty in types {
        let key = ty.to_token_stream().to_string();
        if seen.contains(&key) {
            return Err(syn::Error::new_spanned(
                ty,
                format!("`{key}` is already an alternative; each type may appear only once"),
            )
            .into());
        }
        seen.push(key);
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum AlternativesError {
    NotAStruct,
    NoFields,
    Syn(syn::Error),
}

impl From<syn::Error> for AlternativesError {
    fn from(value: syn::Error) -> Self {
        Self::Syn(value)
    }
}
