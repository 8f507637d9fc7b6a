mod access;
mod schema;

use crate::schema::Record;

use proc_macro2::TokenStream;
use quote::quote;

struct Expand<'a> {
    /// The record being expanded
    record: &'a Record,

    /// Path prefix for docket types
    docket: TokenStream,
}

impl Expand<'_> {
    fn expand(&self) -> TokenStream {
        let docket = &self.docket;
        let ident = &self.record.ident;
        let schema = self.expand_schema();
        let get = self.expand_get();
        let set = self.expand_set();
        let coerce = self.expand_coerce();

        wrap_in_const(quote! {
            impl #docket::Record for #ident {
                #schema
                #get
                #set
                #coerce
            }
        })
    }
}

pub(super) fn record(record: &Record) -> TokenStream {
    Expand {
        record,
        docket: quote!(_docket::codegen_support),
    }
    .expand()
}

fn wrap_in_const(code: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            use docket as _docket;
            #code
        };
    }
}
