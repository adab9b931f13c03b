use proc_macro::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, Index};

fn runtime_crate_path() -> proc_macro2::TokenStream {
    match crate_name("shapehash") {
        Ok(FoundCrate::Itself) | Err(_) => quote!(::shapehash),
        Ok(FoundCrate::Name(name)) => {
            let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
            quote!(::#ident)
        }
    }
}

/// Derives `Shape` for a struct from its field offsets and types. Whether
/// the resulting shape is hashable is decided later, by plan compilation;
/// the derive only records layout facts.
#[proc_macro_derive(Shape)]
pub fn derive_shape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Shape can only be derived for structs",
        ));
    };

    let sh = runtime_crate_path();
    let name = &input.ident;
    let name_str = name.to_string();

    let field_entries: Vec<proc_macro2::TokenStream> = match &data.fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|field| {
                let ident = field.ident.as_ref().expect("named field has an ident");
                let ty = &field.ty;
                quote! {
                    #sh::FieldShape {
                        offset: ::core::mem::offset_of!(Self, #ident),
                        shape: <#ty as #sh::Shape>::SHAPE,
                    }
                }
            })
            .collect(),
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let index = Index::from(i);
                let ty = &field.ty;
                quote! {
                    #sh::FieldShape {
                        offset: ::core::mem::offset_of!(Self, #index),
                        shape: <#ty as #sh::Shape>::SHAPE,
                    }
                }
            })
            .collect(),
        Fields::Unit => Vec::new(),
    };

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#sh::Shape));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        unsafe impl #impl_generics #sh::Shape for #name #ty_generics #where_clause {
            const SHAPE: &'static #sh::TypeShape = &#sh::TypeShape {
                name: #name_str,
                size: ::core::mem::size_of::<Self>(),
                kind: #sh::ShapeKind::Struct {
                    fields: &[#(#field_entries),*],
                },
            };
        }
    })
}
