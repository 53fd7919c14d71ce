//! Provides `#[derive(SszType)]` for structs with named fields.
//!
//! Fields are encoded in the order they are defined. Size annotations go on fields:
//!
//! ```ignore
//! #[derive(SszType)]
//! struct SyncAggregate {
//!     #[dynssz(ssz_size = "64", dynssz_size = "SYNC_COMMITTEE_SIZE/8")]
//!     sync_committee_bits: Vec<u8>,
//!     #[dynssz(ssz_size = "96")]
//!     sync_committee_signature: Vec<u8>,
//! }
//!
//! #[derive(SszType, ssz_derive::Encode, ssz_derive::Decode)]
//! #[dynssz(fixed_codec)]
//! struct Checkpoint {
//!     epoch: u64,
//!     root: [u8; 32],
//! }
//! ```
//!
//! `#[dynssz(fixed_codec)]` uses the `ssz::Encode`/`ssz::Decode` implementations of the type
//! while its layout does not depend on spec values; `#[dynssz(fixed_codec = "path::to::fn")]`
//! names a function returning a `dynssz::FixedCodec<Self>` instead. A fixed codec whose layout
//! differs from the annotated one is never used: `ssz_derive` encodes a `Vec<u8>` as a list,
//! so `SyncAggregate` above would need a hand-written codec.

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Lit, Meta, NestedMeta};

enum FixedCodecAttr {
    None,
    Ssz,
    Function(syn::Path),
}

struct SszField<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    ssz_size: Option<String>,
    dynssz_size: Option<String>,
}

fn dynssz_attrs(attrs: &[Attribute]) -> syn::Result<Vec<NestedMeta>> {
    let mut nested = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path.is_ident("dynssz")) {
        match attr.parse_meta()? {
            Meta::List(list) => nested.extend(list.nested),
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "expected #[dynssz(...)]",
                ))
            }
        }
    }
    Ok(nested)
}

fn lit_str(lit: &Lit) -> syn::Result<&syn::LitStr> {
    match lit {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(other.span(), "expected a string literal")),
    }
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<FixedCodecAttr> {
    let mut codec = FixedCodecAttr::None;
    for meta in dynssz_attrs(attrs)? {
        match meta {
            NestedMeta::Meta(Meta::Path(path)) if path.is_ident("fixed_codec") => {
                codec = FixedCodecAttr::Ssz;
            }
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("fixed_codec") => {
                codec = FixedCodecAttr::Function(lit_str(&nv.lit)?.parse()?);
            }
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "unknown container attribute, expected `fixed_codec`",
                ))
            }
        }
    }
    Ok(codec)
}

fn parse_field(field: &syn::Field) -> syn::Result<SszField<'_>> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new(field.span(), "SszType requires named fields"))?;
    let mut parsed = SszField {
        ident,
        ty: &field.ty,
        ssz_size: None,
        dynssz_size: None,
    };
    for meta in dynssz_attrs(&field.attrs)? {
        match meta {
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("ssz_size") => {
                parsed.ssz_size = Some(lit_str(&nv.lit)?.value());
            }
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("dynssz_size") => {
                parsed.dynssz_size = Some(lit_str(&nv.lit)?.value());
            }
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "unknown field attribute, expected `ssz_size` or `dynssz_size`",
                ))
            }
        }
    }
    Ok(parsed)
}

fn optional_str(value: &Option<String>) -> TokenStream2 {
    match value {
        Some(s) => quote! { ::core::option::Option::Some(#s) },
        None => quote! { ::core::option::Option::None },
    }
}

/// Implements `dynssz::SszType` for a struct with named fields.
#[proc_macro_derive(SszType, attributes(dynssz))]
pub fn ssz_type_derive(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as DeriveInput);
    expand(&item)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn expand(item: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &item.ident;
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "SszType cannot be derived for generic types",
        ));
    }
    let struct_data = match &item.data {
        Data::Struct(s) => s,
        Data::Enum(e) => {
            return Err(syn::Error::new(
                e.enum_token.span(),
                "SszType can only be derived for structs",
            ))
        }
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "SszType can only be derived for structs",
            ))
        }
    };
    let fields = match &struct_data.fields {
        Fields::Named(named) if !named.named.is_empty() => named
            .named
            .iter()
            .map(parse_field)
            .collect::<syn::Result<Vec<_>>>()?,
        Fields::Named(_) => {
            return Err(syn::Error::new(
                name.span(),
                "SszType cannot be derived for containers without fields",
            ))
        }
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "SszType requires named fields",
            ))
        }
    };
    let codec = parse_container_attrs(&item.attrs)?;

    let type_name = name.to_string();
    let idents: Vec<_> = fields.iter().map(|f| f.ident).collect();
    let names: Vec<_> = fields.iter().map(|f| f.ident.to_string()).collect();
    let types: Vec<_> = fields.iter().map(|f| f.ty).collect();
    let indices: Vec<_> = (0..fields.len()).map(syn::Index::from).collect();
    let tags = fields.iter().zip(&names).map(|(field, field_name)| {
        let ssz_size = optional_str(&field.ssz_size);
        let dynssz_size = optional_str(&field.dynssz_size);
        quote! {
            ::dynssz::FieldTags {
                name: #field_name,
                ssz_size: #ssz_size,
                dynssz_size: #dynssz_size,
            }
        }
    });

    let fixed_codec = match codec {
        FixedCodecAttr::None => quote! {},
        FixedCodecAttr::Ssz => quote! {
            fn fixed_codec() -> ::core::option::Option<::dynssz::FixedCodec<Self>> {
                ::core::option::Option::Some(::dynssz::FixedCodec::ssz())
            }
        },
        FixedCodecAttr::Function(path) => quote! {
            fn fixed_codec() -> ::core::option::Option<::dynssz::FixedCodec<Self>> {
                ::core::option::Option::Some(#path())
            }
        },
    };

    Ok(quote! {
        impl ::dynssz::SszType for #name {
            fn type_name() -> &'static str {
                #type_name
            }

            fn field_tags() -> &'static [::dynssz::FieldTags] {
                const FIELDS: &[::dynssz::FieldTags] = &[#(#tags),*];
                FIELDS
            }

            fn ssz_static_size(
                ctx: &::dynssz::DynSsz,
                _hints: &[::dynssz::SizeHint],
            ) -> ::core::result::Result<::dynssz::TypeSize, ::dynssz::Error> {
                ctx.container_static_size::<Self, _>(|| {
                    let hints = ctx.field_hints::<Self>()?;
                    let size = ::dynssz::TypeSize::fixed(0);
                    #(
                        let size = size.concat(
                            <#types as ::dynssz::SszType>::ssz_static_size(ctx, &hints[#indices])?,
                        );
                    )*
                    ::core::result::Result::Ok(size)
                })
            }

            fn ssz_value_size(
                &self,
                ctx: &::dynssz::DynSsz,
                _hints: &[::dynssz::SizeHint],
            ) -> ::core::result::Result<usize, ::dynssz::Error> {
                let hints = ctx.field_hints::<Self>()?;
                let mut size = 0usize;
                #(
                    size += ::dynssz::field_value_size(ctx, &self.#idents, &hints[#indices])?;
                )*
                ::core::result::Result::Ok(size)
            }

            fn ssz_marshal(
                &self,
                ctx: &::dynssz::DynSsz,
                _hints: &[::dynssz::SizeHint],
                buf: &mut ::std::vec::Vec<u8>,
            ) -> ::core::result::Result<(), ::dynssz::Error> {
                let hints = ctx.field_hints::<Self>()?;
                let mut encoder = ::dynssz::ContainerEncoder::new(ctx, #type_name, buf);
                #(
                    encoder.append(#names, &self.#idents, &hints[#indices])?;
                )*
                encoder.finalize()
            }

            fn ssz_unmarshal(
                ctx: &::dynssz::DynSsz,
                _hints: &[::dynssz::SizeHint],
                bytes: &[u8],
            ) -> ::core::result::Result<(Self, usize), ::dynssz::Error> {
                let hints = ctx.field_hints::<Self>()?;
                let mut builder = ::dynssz::ContainerDecoderBuilder::new(ctx, #type_name, bytes);
                #(
                    builder.register::<#types>(#names, &hints[#indices])?;
                )*
                let mut decoder = builder.build()?;
                let value = Self {
                    #(
                        #idents: decoder.decode_next::<#types>()?,
                    )*
                };
                ::core::result::Result::Ok((value, bytes.len()))
            }

            #fixed_codec
        }
    })
}
