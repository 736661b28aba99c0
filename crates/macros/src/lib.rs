use proc_macro::TokenStream;
use quote::quote;

#[derive(deluxe::ParseMetaItem)]
#[deluxe(attributes(similarity_algorithm))]
struct AlgorithmAttributes(syn::Ident, #[deluxe(flatten)] AlgorithmNamedAttributes);

#[derive(deluxe::ParseMetaItem)]
struct AlgorithmNamedAttributes {
  name: String,
}

/// Turn a `similarity` function into a unit struct implementing `Similarity`.
///
/// The annotated function must have the signature
/// `fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64`,
/// and the `Similarity` trait must be in scope where the macro is used.
#[proc_macro_attribute]
pub fn similarity_algorithm(attrs: TokenStream, input: TokenStream) -> TokenStream {
  let AlgorithmAttributes(ident, AlgorithmNamedAttributes { name }) = match deluxe::parse2::<AlgorithmAttributes>(attrs.into()) {
    Ok(attrs) => attrs,
    Err(err) => return err.to_compile_error().into(),
  };

  let input = proc_macro2::TokenStream::from(input);

  quote! {
      #[derive(Clone, Copy, Debug, Default)]
      pub struct #ident;

      impl Similarity for #ident {
        fn name(&self) -> &'static str {
            #name
        }

        #[tracing::instrument(level = "trace", name = #name, skip_all, fields(field = %config.field))]
        #input
      }
  }
  .into()
}
