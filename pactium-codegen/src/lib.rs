use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use quote::quote_spanned;

/// Wraps a consumer contract test in a pactium session.
///
/// The generated test builds a `PactiumConfiguration` from the consumer and
/// provider names, applies the optional configuration function, starts a
/// `TestSession` bound to a `session` variable visible to the test body,
/// and tears the session down on every exit path. On the happy path the
/// session is finished, which writes the contract document and fails the
/// test if any registered interaction was never exercised.
#[proc_macro_attribute]
pub fn pactium_consumer_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    let signature = &input.sig;
    let block = &input.block;

    if args.len() < 2 {
        return quote! {
            compile_error!("A consumer name and a provider name should be passed to the macro");
        }
        .into();
    }

    let consumer_name = match parse_participant_name(&args[0]) {
        Ok(name) => name,
        Err(stream) => return stream.into(),
    };
    let provider_name = match parse_participant_name(&args[1]) {
        Ok(name) => name,
        Err(stream) => return stream.into(),
    };

    let configure_statement = match args.get(2) {
        Some(syn::NestedMeta::Meta(syn::Meta::Path(configuration_function))) => quote! {
            #configuration_function(&mut __pactium_configuration);
        },
        Some(_) => {
            return quote! {
                compile_error!("The third argument should be a configuration function!");
            }
            .into();
        }
        None => quote! {},
    };

    let output = quote! {
        #[test]
        #signature {
            let mut __pactium_configuration =
                pactium::PactiumConfiguration::new(#consumer_name, #provider_name);
            #configure_statement
            let __pactium_session = pactium::TestSession::start(__pactium_configuration)
                .expect("Couldn't start the pactium mock server");
            let session = &__pactium_session;

            if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                #block
            })) {
                drop(__pactium_session);
                std::panic::resume_unwind(e);
            }

            if let Err(e) = __pactium_session.finish() {
                panic!("Pactium Error: {}", e);
            }
        }
    };

    TokenStream::from(output)
}

fn parse_participant_name(arg: &syn::NestedMeta) -> Result<String, proc_macro2::TokenStream> {
    if let syn::NestedMeta::Lit(syn::Lit::Str(name)) = arg {
        validate_participant_name(&name.value(), name.span())?;
        Ok(name.value())
    } else {
        Err(quote! {
            compile_error!("Consumer and provider names should be string literals!");
        })
    }
}

fn validate_participant_name(name: &str, span: Span) -> Result<(), proc_macro2::TokenStream> {
    if name.trim().is_empty() {
        return Err(quote_spanned! {span=>
            compile_error!("Consumer and provider names shouldn't be empty!");
        });
    }

    Ok(())
}
