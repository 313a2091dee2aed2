mod options_attr;
use std::path::Path;

use optkit_core::{OptionKind, OptionSpec, OptionValue, OptionsSpec};
use proc_macro2::{Literal, Span, TokenStream};
use quote::quote;
use syn::parse_macro_input;

use crate::options_attr::OptionsAttr;

/// Turns a unit struct into a typed view of the options declared in a TOML
/// definitions file.
#[proc_macro_attribute]
pub fn options(
    args: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let options_attr = parse_macro_input!(args as OptionsAttr);
    let input_parsed = parse_macro_input!(input as syn::ItemStruct);

    expand(&options_attr, &input_parsed)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(options_attr: &OptionsAttr, item: &syn::ItemStruct) -> syn::Result<TokenStream> {
    let path = options_attr.full_path()?;
    let fail = |message: String| syn::Error::new(item.ident.span(), message);

    let spec = OptionsSpec::from_file(&path).map_err(|e| fail(e.to_string()))?;
    spec.build()
        .map_err(|e| fail(format!("invalid definitions in {}: {e}", path.display())))?;

    generate_struct(&spec, item, &path)
}

fn generate_struct(
    spec: &OptionsSpec,
    item: &syn::ItemStruct,
    path: &Path,
) -> syn::Result<TokenStream> {
    let struct_name = &item.ident;
    let vis = &item.vis;
    let attrs = &item.attrs;

    let fields = spec
        .options
        .iter()
        .map(|option| Ok((field_ident(option)?, option)))
        .collect::<syn::Result<Vec<_>>>()?;

    let field_definitions = fields.iter().map(|(ident, option)| {
        let field_type = field_type(option);
        let doc = option.doc.iter();
        quote! {
            #(#[doc = #doc])*
            pub #ident: #field_type,
        }
    });
    let field_reads = fields.iter().map(|(ident, option)| {
        let read = read_field(option);
        quote! { #ident: #read, }
    });
    let registrations = spec
        .options
        .iter()
        .map(register_option)
        .collect::<syn::Result<Vec<_>>>()?;
    let frame = help_frame(spec);

    let config_option = spec.config.clone().unwrap_or_default();
    let path_str = path.to_string_lossy().into_owned();

    // The `include_bytes!` makes cargo rebuild the struct when the
    // definitions file changes.
    Ok(quote! {
        #(#attrs)*
        #[derive(Debug, Clone, PartialEq)]
        #vis struct #struct_name {
            #(#field_definitions)*
        }

        const _: &[u8] = include_bytes!(#path_str);

        impl #struct_name {
            /// A container holding every declared option with its default.
            pub fn container() -> ::optkit::Result<::optkit::OptionsCont> {
                let mut options = ::optkit::OptionsCont::new();
                #frame
                #(#registrations)*
                Ok(options)
            }

            pub fn from_container(options: &::optkit::OptionsCont) -> ::optkit::Result<Self> {
                Ok(Self {
                    #(#field_reads)*
                })
            }

            /// Resolves the options from `args` (without the program name)
            /// and the configuration file they name.
            pub fn parse_from<I, T>(args: I) -> ::optkit::Result<(Self, ::optkit::OptionsCont)>
            where
                I: IntoIterator<Item = T>,
                T: AsRef<str>,
            {
                let args: Vec<String> = args
                    .into_iter()
                    .map(|arg| arg.as_ref().to_string())
                    .collect();
                let mut options = Self::container()?;
                ::optkit::parse_and_load(
                    &mut options,
                    args.as_slice(),
                    #config_option,
                    ::optkit::ParseSettings::default(),
                )?;
                Ok((Self::from_container(&options)?, options))
            }

            /// Like [`Self::parse_from`], reading the process arguments.
            pub fn parse() -> ::optkit::Result<(Self, ::optkit::OptionsCont)> {
                Self::parse_from(::std::env::args().skip(1))
            }

            pub fn help() -> ::optkit::Result<String> {
                Ok(::optkit::HelpFormatter::default().render(&Self::container()?))
            }
        }
    })
}

fn field_ident(option: &OptionSpec) -> syn::Result<syn::Ident> {
    let name = option.name.replace('-', "_");
    syn::parse_str::<syn::Ident>(&name)
        .or_else(|_| syn::parse_str::<syn::Ident>(&format!("r#{name}")))
        .map_err(|_| {
            syn::Error::new(
                Span::call_site(),
                format!("option '{}' can not be used as a field name", option.name),
            )
        })
}

fn value_type(kind: OptionKind) -> TokenStream {
    match kind {
        OptionKind::Bool => quote! { bool },
        OptionKind::Int => quote! { i64 },
        OptionKind::Double => quote! { f64 },
        OptionKind::String => quote! { String },
        OptionKind::FileName => quote! { ::std::path::PathBuf },
    }
}

fn is_required(option: &OptionSpec) -> bool {
    option.kind == OptionKind::Bool || option.default.is_some()
}

fn field_type(option: &OptionSpec) -> TokenStream {
    let ty = value_type(option.kind);
    if is_required(option) {
        ty
    } else {
        quote! { Option<#ty> }
    }
}

fn read_field(option: &OptionSpec) -> TokenStream {
    let name = &option.name;
    let get = match option.kind {
        OptionKind::Bool => quote! { options.get_bool(#name)? },
        OptionKind::Int => quote! { options.get_int(#name)? },
        OptionKind::Double => quote! { options.get_double(#name)? },
        OptionKind::String => quote! { options.get_string(#name)?.to_string() },
        OptionKind::FileName => {
            quote! { ::std::path::PathBuf::from(options.get_string(#name)?) }
        }
    };
    match (option.kind, option.default.is_some()) {
        (_, true) => get,
        (OptionKind::Bool, false) => quote! {
            if options.is_set(#name)? { #get } else { false }
        },
        (_, false) => quote! {
            if options.is_set(#name)? { Some(#get) } else { None }
        },
    }
}

fn register_option(option: &OptionSpec) -> syn::Result<TokenStream> {
    let name = &option.name;
    let fail = |message: String| syn::Error::new(Span::call_site(), message);
    let raw = option.default_raw().map_err(|e| fail(e.to_string()))?;
    let constructor = match raw {
        None => match option.kind {
            OptionKind::Bool => quote! { ::optkit::TypedOption::bool() },
            OptionKind::Int => quote! { ::optkit::TypedOption::int() },
            OptionKind::Double => quote! { ::optkit::TypedOption::double() },
            OptionKind::String => quote! { ::optkit::TypedOption::string() },
            OptionKind::FileName => quote! { ::optkit::TypedOption::file_name() },
        },
        Some(raw) => {
            let value = option.kind.parse(&raw).map_err(|e| fail(e.to_string()))?;
            match (option.kind, value) {
                (_, OptionValue::Bool(b)) => quote! { ::optkit::TypedOption::bool_default(#b) },
                (_, OptionValue::Int(i)) => {
                    let lit = Literal::i64_suffixed(i);
                    quote! { ::optkit::TypedOption::int_default(#lit) }
                }
                (_, OptionValue::Double(f)) if f.is_finite() => {
                    let lit = Literal::f64_suffixed(f);
                    quote! { ::optkit::TypedOption::double_default(#lit) }
                }
                (_, OptionValue::Double(_)) => {
                    return Err(fail(format!("the default of '{name}' must be finite")));
                }
                (OptionKind::FileName, OptionValue::String(s)) => {
                    quote! { ::optkit::TypedOption::file_name_default(#s) }
                }
                (_, OptionValue::String(s)) => {
                    quote! { ::optkit::TypedOption::string_default(#s) }
                }
            }
        }
    };

    let section = option
        .section
        .iter()
        .map(|section| quote! { options.begin_section(#section); });
    let add = match option.short {
        Some(short) => quote! { options.add_with_abbr(#name, #short, #constructor)?; },
        None => quote! { options.add(#name, #constructor)?; },
    };
    let synonyms = option.synonyms.iter();
    let doc = option
        .doc
        .iter()
        .map(|doc| quote! { options.set_description(#name, #doc)?; });

    Ok(quote! {
        #(#section)*
        #add
        #(options.add_synonym(#name, #synonyms)?;)*
        #(#doc)*
    })
}

fn help_frame(spec: &OptionsSpec) -> TokenStream {
    let head = spec.head.iter();
    let tail = spec.tail.iter();
    let parent = spec.parent.iter();
    quote! {
        #(options.set_help_head(#head);)*
        #(options.set_help_tail(#tail);)*
        #(options.set_parent_configuration_name(#parent);)*
    }
}
