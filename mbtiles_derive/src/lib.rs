//! Procedural macros shared by the mbtiles crates.

use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::{ToTokens, quote};
use syn::parse_macro_input;

/// Attaches a formatted message to every error returned by the annotated function.
///
/// The function must return an `anyhow::Result`. The attribute arguments are passed
/// verbatim to `format!`, so they may reference the function's parameters:
///
/// ```ignore
/// #[context("reading tile {coord} from '{}'", self.path.display())]
/// fn read_tile(&self, coord: TileCoord) -> Result<Option<Blob>> { ... }
/// ```
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let format_args = proc_macro2::TokenStream::from(args);
	let mut input = parse_macro_input!(input as syn::ItemFn);

	if input.sig.asyncness.is_some() {
		return syn::Error::new_spanned(input.sig.asyncness, "#[context] supports synchronous functions only")
			.to_compile_error()
			.into();
	}

	let return_type = match &input.sig.output {
		syn::ReturnType::Default => {
			return syn::Error::new_spanned(&input.sig, "function should return Result")
				.to_compile_error()
				.into();
		}
		syn::ReturnType::Type(_, ty) => ty.clone(),
	};

	let body = &input.block;
	let err = Ident::new("err", Span::mixed_site());
	let once = Ident::new("once", Span::mixed_site());

	// The captured `once` marker makes the closure `FnOnce`, so the body may move out of its captures.
	let new_body = quote! {
		let #once = ::core::iter::empty::<()>();
		(|| -> #return_type {
			::core::mem::drop(#once);
			#body
		})()
		.map_err(|#err| #err.context(format!(#format_args)).into())
	};
	input.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(new_body), None)];

	input.into_token_stream().into()
}
