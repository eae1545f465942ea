use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Expr, Field, Fields, Ident, LitStr, Result, Token,
    ext::IdentExt,
    parse::{Parse, ParseStream},
};

pub(crate) fn expand_record(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new_spanned(
            input,
            "`Record` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new_spanned(
            input,
            "`Record` may only be derived on structs with named fields.",
        ))?
    };

    let order = byte_order(input)?;

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .collect::<Result<Vec<_>>>()?;

    let mut names: Vec<&LitStr> = Vec::new();
    for name in fields.iter().filter_map(|f| f.decoded.as_ref().map(|(n, _)| n)) {
        if names.iter().any(|n| n.value() == name.value()) {
            Err(Error::new_spanned(name, "Field names must be unique."))?
        }
        names.push(name);
    }

    let builder_fields = fields.iter().filter_map(|field| {
        let (name, descriptor) = field.decoded.as_ref()?;
        Some(quote! { .field(#name, #descriptor) })
    });

    let assignments = fields.iter().map(|field| {
        let ident = &field.ident;

        match &field.decoded {
            Some((name, _)) => quote! { #ident: fields.take_as(#name)? },
            None => quote! { #ident: ::core::default::Default::default() },
        }
    });

    let builder_order = order.map(|order| {
        quote! { .byte_order(::bindecl::ByteOrder::#order) }
    });

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::bindecl::Record for #name #ty_generics #where_clause {
            fn format() -> ::core::result::Result<::bindecl::Format, ::bindecl::Error> {
                ::bindecl::Format::builder()
                    #builder_order
                    #(#builder_fields)*
                    .build()
            }

            #[allow(unused_mut, unused_variables)]
            fn assemble(
                mut fields: ::bindecl::Context,
            ) -> ::core::result::Result<Self, ::bindecl::Error> {
                ::core::result::Result::Ok(Self {
                    #(#assignments,)*
                })
            }
        }

        impl #impl_generics ::bindecl::FromValue for #name #ty_generics #where_clause {
            fn from_value(
                value: ::bindecl::Value,
            ) -> ::core::result::Result<Self, ::bindecl::Error> {
                <Self as ::bindecl::Record>::assemble(
                    <::bindecl::Context as ::bindecl::FromValue>::from_value(value)?,
                )
            }
        }
    };

    Ok(expanded.into())
}

/// Read the byte order from a `#[record(byte_order = "...")]` attribute.
fn byte_order(input: &DeriveInput) -> Result<Option<Ident>> {
    let mut order = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("byte_order") {
                Err(meta.error("Unknown record attribute."))?
            }

            let value: LitStr = meta.value()?.parse()?;
            let variant = match value.value().as_str() {
                "little" => "Little",
                "big" => "Big",
                _ => Err(Error::new_spanned(
                    &value,
                    "Byte order must be `\"little\"` or `\"big\"`.",
                ))?,
            };

            order = Some(Ident::new(variant, value.span()));
            Ok(())
        })?;
    }

    Ok(order)
}

#[derive(Debug)]
struct FieldMetadata {
    ident: Ident,
    /// Field name and descriptor, if the field is decoded.
    decoded: Option<(LitStr, Expr)>,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Self> {
        let Some(ident) = field.ident.clone() else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("field")) else {
            return Ok(Self {
                ident,
                decoded: None,
            });
        };

        let FieldAttribute { descriptor, name } = attr.meta.require_list()?.parse_args()?;

        let name = name.unwrap_or_else(|| LitStr::new(&ident.unraw().to_string(), ident.span()));

        Ok(Self {
            ident,
            decoded: Some((name, descriptor)),
        })
    }
}

#[derive(Debug)]
struct FieldAttribute {
    descriptor: Expr,
    name: Option<LitStr>,
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let descriptor = input.parse::<Expr>()?;

        let name = if !input.is_empty() {
            input.parse::<Token![,]>()?;

            let key = input.parse::<Ident>()?;
            if key != "name" {
                Err(Error::new_spanned(key, "Expected `name = \"...\"`."))?
            }

            input.parse::<Token![=]>()?;
            Some(input.parse::<LitStr>()?)
        } else {
            None
        };

        Ok(Self { descriptor, name })
    }
}
