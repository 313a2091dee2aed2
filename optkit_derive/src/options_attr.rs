use std::{
    env,
    path::{Path, PathBuf},
};

use proc_macro2::Span;
use syn::{Token, parse::Parse, parse::ParseStream};

/// Arguments of `#[options]`: the definitions file, relative to the crate
/// being compiled.
#[derive(Debug)]
pub(crate) struct OptionsAttr {
    path: String,
}

impl OptionsAttr {
    pub(crate) fn full_path(&self) -> syn::Result<PathBuf> {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR")
            .map_err(|_| syn::Error::new(Span::call_site(), "CARGO_MANIFEST_DIR is not set"))?;
        Ok(Path::new(&manifest_dir).join(&self.path))
    }
}

impl Default for OptionsAttr {
    fn default() -> Self {
        Self {
            path: "options.toml".to_string(),
        }
    }
}

impl Parse for OptionsAttr {
    /// Accepts `"file.toml"` or `path = "file.toml"`, at most once.
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut path: Option<syn::LitStr> = None;
        while !input.is_empty() {
            let lit: syn::LitStr = if input.peek(syn::LitStr) {
                input.parse()?
            } else {
                let key: syn::Ident = input.parse()?;
                if key != "path" {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("unknown parameter `{key}`"),
                    ));
                }
                input.parse::<Token![=]>()?;
                input.parse()?
            };
            if path.is_some() {
                return Err(syn::Error::new(lit.span(), "definitions path given twice"));
            }
            path = Some(lit);
            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(path
            .map(|lit| Self { path: lit.value() })
            .unwrap_or_default())
    }
}
