//! Proc macros for cntryl-timer.
//!
//! This crate provides the `#[timed]` attribute macro, which reports how
//! long a function body took every time it runs.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Expr, ItemFn, LitStr};

/// Time every call of the annotated function.
///
/// The body is wrapped in a `BlockTimer` guard whose call site is the
/// function itself. The report is written when the body exits, including
/// early returns and `?`, to stdout unless `sink` says otherwise.
///
/// # Example
///
/// ```rust,ignore
/// use cntryl_timer::timed;
///
/// #[timed]
/// fn load_index() -> usize {
///     42
/// }
///
/// #[timed(name = "compaction", unit = "ms")]
/// fn compact() {}
/// ```
///
/// # Attributes
///
/// - `#[timed]` - Report under the function's name, automatic unit
/// - `#[timed(name = "label")]` - Use a custom label
/// - `#[timed(unit = "ms")]` - Fixed unit: `ns`, `us`, `ms`, `s`, `m`, `h` or `auto`
/// - `#[timed(format = "{name}: {result}")]` - Custom report template
/// - `#[timed(sink = expr)]` - Write to the `OutputSink` built by `expr`, evaluated per call
#[proc_macro_attribute]
pub fn timed(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let mut name: Option<LitStr> = None;
    let mut unit: Option<LitStr> = None;
    let mut format: Option<LitStr> = None;
    let mut sink: Option<Expr> = None;
    let attr_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("unit") {
            unit = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("format") {
            format = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("sink") {
            sink = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error(
                "unsupported timed attribute, expected `name`, `unit`, `format` or `sink`",
            ))
        }
    });
    parse_macro_input!(attr with attr_parser);

    let unit = match unit.as_ref().map(unit_variant).transpose() {
        Ok(v) => v.unwrap_or_else(|| quote!(Automatic)),
        Err(e) => return e.to_compile_error().into(),
    };

    let format = format.map(|f| quote!(.format(#f)));
    let sink = sink.map(|s| quote!(.sink(#s)));

    let fn_name_str = input.sig.ident.to_string();
    let name = name.map_or(fn_name_str.clone(), |n| n.value());

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;
    let stmts = &block.stmts;

    let expanded = quote! {
        #(#attrs)*
        #vis #sig {
            let __cntryl_timer_guard = ::cntryl_timer::BlockTimer::start(
                ::cntryl_timer::TimerSettings::new(#name)
                    .unit(::cntryl_timer::DurationUnit::#unit)
                    #format
                    #sink
                    .call_site(::cntryl_timer::CallSite::new(
                        file!(),
                        line!(),
                        column!(),
                        concat!(module_path!(), "::", #fn_name_str),
                    )),
            )
            .into_guard();
            #(#stmts)*
        }
    };

    TokenStream::from(expanded)
}

fn unit_variant(lit: &LitStr) -> syn::Result<proc_macro2::TokenStream> {
    let variant = match lit.value().as_str() {
        "auto" => quote!(Automatic),
        "ns" => quote!(Nanoseconds),
        "us" => quote!(Microseconds),
        "ms" => quote!(Milliseconds),
        "s" => quote!(Seconds),
        "m" => quote!(Minutes),
        "h" => quote!(Hours),
        other => {
            return Err(syn::Error::new(
                lit.span(),
                format!("unknown unit `{other}`, expected auto, ns, us, ms, s, m or h"),
            ))
        }
    };
    Ok(variant)
}
