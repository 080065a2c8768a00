use darling::{FromDeriveInput, FromField, ast, util::Flag};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Generics, Ident};

///
/// EntityInput
///

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(quarry), supports(struct_named))]
struct EntityInput {
    ident: Ident,
    generics: Generics,
    data: ast::Data<(), EntityField>,

    /// Table used by convenience queries.
    table: Option<String>,

    /// Members bind as constructor parameters.
    constructor: Flag,
}

///
/// EntityField
///

#[derive(Debug, FromField)]
#[darling(attributes(quarry))]
struct EntityField {
    ident: Option<Ident>,
    column: Option<String>,
    ignore: Flag,
}

// derive_entity
pub fn derive_entity(input: TokenStream) -> TokenStream {
    match expand(input) {
        Ok(tokens) => tokens,
        Err(err) => err.write_errors(),
    }
}

fn expand(input: TokenStream) -> Result<TokenStream, darling::Error> {
    let input: DeriveInput = syn::parse2(input)?;
    let entity = EntityInput::from_derive_input(&input)?;
    entity.validate()?;

    let ident = &entity.ident;
    let model_ident = format_ident!("__QUARRY_{}_MODEL", ident.to_string().to_uppercase());

    let fields = entity
        .data
        .as_ref()
        .take_struct()
        .map(|fields| fields.fields)
        .unwrap_or_default();

    let field_models = fields.iter().filter_map(|field| {
        let name = field.ident.as_ref()?.to_string();
        let mut model = quote!(::quarry::core::model::field::FieldModel::new(#name));
        if let Some(column) = &field.column {
            model = quote!(#model.column(#column));
        }
        if field.ignore.is_present() {
            model = quote!(#model.ignored());
        }

        Some(model)
    });

    let field_inits = fields.iter().filter_map(|field| {
        let member = field.ident.as_ref()?;
        let name = member.to_string();

        Some(if field.ignore.is_present() {
            quote!(#member: ::core::default::Default::default())
        } else {
            quote!(#member: row.member(#name)?)
        })
    });

    let table = match &entity.table {
        Some(table) => quote!(::core::option::Option::Some(#table)),
        None => quote!(::core::option::Option::None),
    };
    let explicit_constructor = entity.constructor.is_present();

    Ok(quote! {
        #[doc(hidden)]
        const #model_ident: ::quarry::core::model::entity::EntityModel =
            ::quarry::core::model::entity::EntityModel {
                path: ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident)),
                unit: ::core::env!("CARGO_PKG_NAME"),
                table: #table,
                explicit_constructor: #explicit_constructor,
                fields: &[#(#field_models),*],
            };

        impl ::quarry::core::traits::FromRow for #ident {
            const MODEL: ::core::option::Option<&'static ::quarry::core::model::entity::EntityModel> =
                ::core::option::Option::Some(&#model_ident);

            fn from_row(
                row: ::quarry::core::row::RowView<'_>,
            ) -> ::core::result::Result<Self, ::quarry::core::Error> {
                ::core::result::Result::Ok(Self {
                    #(#field_inits),*
                })
            }
        }

        #[::quarry::__reexports::ctor::ctor(unsafe, anonymous, crate_path = ::quarry::__reexports::ctor)]
        fn __ctor() {
            ::quarry::core::mapping::catalog().insert(&#model_ident);
        }
    })
}

impl EntityInput {
    fn validate(&self) -> Result<(), darling::Error> {
        let mut errors = darling::Error::accumulator();

        if !self.generics.params.is_empty() {
            errors.push(
                darling::Error::custom("Entity cannot be derived for generic types")
                    .with_span(&self.generics),
            );
        }

        if let Some(table) = &self.table
            && table.trim().is_empty()
        {
            errors.push(darling::Error::custom("table name cannot be empty").with_span(&self.ident));
        }

        if let Some(fields) = self.data.as_ref().take_struct() {
            for field in fields.fields {
                if let Some(column) = &field.column
                    && column.trim().is_empty()
                {
                    let err = darling::Error::custom("column name cannot be empty");
                    errors.push(match &field.ident {
                        Some(ident) => err.with_span(ident),
                        None => err,
                    });
                }
            }
        }

        errors.finish()
    }
}
