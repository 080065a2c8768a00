use proc_macro::TokenStream;

mod entity;

/// Derive row mapping metadata for a struct with named fields.
///
/// ```ignore
/// #[derive(Clone, Entity)]
/// #[quarry(table = "User")]
/// struct User {
///     #[quarry(column = "user_id")]
///     id: i64,
///     name: String,
///     #[quarry(ignore)]
///     cached: Option<String>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(quarry))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input.into()).into()
}
