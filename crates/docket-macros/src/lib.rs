extern crate proc_macro;

use proc_macro::TokenStream;

/// Derives `docket::Record` for a struct with named fields.
///
/// Struct options: `#[docket(table = "...", before_schema = "...", after_schema = "...")]`.
///
/// Field options: `#[docket(column = "...", rename = "...", document = "...",
/// data_type = "...")]`, `#[docket(skip)]` and `#[docket(flatten)]`.
#[proc_macro_derive(Record, attributes(docket))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    match docket_codegen::generate(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
