use darling::{
    FromAttributes as _, FromMeta,
    ast::NestedMeta,
    util::{Flag, SpannedValue},
};
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{ToTokens as _, format_ident, quote};
use syn::{Expr, FnArg, Ident, ItemFn, Pat, PatType, Type, spanned::Spanned as _};

use crate::common::{IdentString, compute_docs};

/// Any expression, exactly as written. Unlike darling's `Expr`, a string
/// literal stays a string literal.
struct LiteralExpr(Expr);

impl FromMeta for LiteralExpr {
    fn from_expr(expr: &Expr) -> darling::Result<Self> {
        Ok(Self(expr.clone()))
    }
}

#[derive(FromMeta)]
struct CommandAttr {
    name: Option<SpannedValue<String>>,
}

#[derive(darling::FromAttributes)]
#[darling(attributes(arg))]
struct RawParamAttr {
    keyword: Flag,
    rest: Flag,
    keywords: Flag,
    raw: Flag,
    default: Option<LiteralExpr>,
    choices: Option<LiteralExpr>,
    help: Option<String>,
}

#[derive(Clone, Copy)]
enum ParamKind {
    Positional,
    Keyword,
    Rest,
    Keywords,
}

struct ParamInfo<'a> {
    ident: IdentString<'a>,
    ty: &'a Type,
    kind: ParamKind,
    raw: bool,
    default: Option<Expr>,
    choices: Option<Expr>,
    help: Option<String>,
}

impl<'a> ParamInfo<'a> {
    fn from_arg(arg: &'a PatType) -> syn::Result<Self> {
        let ident = match *arg.pat {
            Pat::Ident(ref pat) if pat.subpat.is_none() && pat.by_ref.is_none() => {
                IdentString::new(&pat.ident)
            }
            ref pat => {
                return Err(syn::Error::new(
                    pat.span(),
                    "#[fncli::command] parameters must be plain identifiers",
                ));
            }
        };

        let parsed = RawParamAttr::from_attributes(&arg.attrs)?;

        let kind = match (
            parsed.keyword.is_present(),
            parsed.rest.is_present(),
            parsed.keywords.is_present(),
        ) {
            (false, false, false) => ParamKind::Positional,
            (true, false, false) => ParamKind::Keyword,
            (false, true, false) => ParamKind::Rest,
            (false, false, true) => ParamKind::Keywords,
            _ => {
                return Err(syn::Error::new(
                    arg.span(),
                    "only one of `keyword`, `rest`, and `keywords` can be used",
                ));
            }
        };

        if parsed.raw.is_present() && parsed.choices.is_some() {
            return Err(syn::Error::new(
                parsed.raw.span(),
                "`raw` and `choices` can't be combined",
            ));
        }

        Ok(Self {
            ident,
            ty: &arg.ty,
            kind,
            raw: parsed.raw.is_present(),
            default: parsed.default.map(|LiteralExpr(expr)| expr),
            choices: parsed.choices.map(|LiteralExpr(expr)| expr),
            help: parsed.help,
        })
    }

    /// An expression building the `fncli::Parameter` for this parameter
    fn descriptor(&self) -> TokenStream2 {
        let name = self.ident.as_str();
        let ty = self.ty;

        let kind = match self.kind {
            ParamKind::Positional => quote! { PositionalRequired },
            ParamKind::Keyword => quote! { KeywordRequired },
            ParamKind::Rest => quote! { VariadicPositional },
            ParamKind::Keywords => quote! { VariadicKeyword },
        };

        let raw = self.raw.then(|| {
            quote! { let parameter = parameter.with_annotation(::fncli::Converter::raw()); }
        });

        let choices = self.choices.as_ref().map(|choices| {
            quote! { let parameter = parameter.with_annotation(::fncli::Choice::new(#choices)?); }
        });

        let default = self.default.as_ref().map(|default| {
            quote! { let parameter = parameter.with_default(#default); }
        });

        let help = self.help.as_ref().map(|help| {
            quote! { let parameter = parameter.with_help(#help); }
        });

        quote! {
            {
                let parameter = ::fncli::Parameter::new(#name, ::fncli::ParameterKind::#kind);
                let parameter = match <#ty as ::fncli::Argument>::annotation() {
                    ::core::option::Option::Some(annotation) => parameter.with_annotation(annotation),
                    ::core::option::Option::None => parameter,
                };
                #raw
                #choices
                #default
                #help
                parameter
            }
        }
    }

    /// A statement reading this parameter's value from `reader`
    fn read(&self, reader: &Ident) -> TokenStream2 {
        let ident = &self.ident;
        let name = self.ident.as_str();
        let ty = self.ty;

        let value = match self.kind {
            ParamKind::Positional => quote! { #reader.positional()? },
            ParamKind::Rest => quote! { #reader.rest()? },
            ParamKind::Keyword | ParamKind::Keywords => quote! { #reader.keyword(#name)? },
        };

        quote! { let #ident: #ty = #value; }
    }
}

/// Reject the function shapes a command can't be built from.
fn check_signature(function: &ItemFn) -> syn::Result<()> {
    let sig = &function.sig;

    if let Some(asyncness) = sig.asyncness {
        return Err(syn::Error::new(
            asyncness.span(),
            "#[fncli::command] doesn't support async functions",
        ));
    }

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            sig.generics.span(),
            "#[fncli::command] doesn't support generic functions",
        ));
    }

    if let Some(variadic) = sig.variadic.as_ref() {
        return Err(syn::Error::new(
            variadic.span(),
            "#[fncli::command] doesn't support C-variadic functions",
        ));
    }

    Ok(())
}

pub fn decorate_fn_command(
    attrs: TokenStream2,
    function: TokenStream2,
) -> syn::Result<TokenStream2> {
    let attr = CommandAttr::from_list(&NestedMeta::parse_meta_list(attrs)?)?;
    let mut function: ItemFn = syn::parse2(function)?;

    check_signature(&function)?;

    let params: Vec<PatType> = function
        .sig
        .inputs
        .iter()
        .map(|input| match input {
            FnArg::Typed(arg) => Ok(arg.clone()),
            FnArg::Receiver(receiver) => Err(syn::Error::new(
                receiver.span(),
                "#[fncli::command] only works on free functions (`self` isn't allowed)",
            )),
        })
        .collect::<syn::Result<_>>()?;

    let infos = params
        .iter()
        .map(ParamInfo::from_arg)
        .collect::<syn::Result<Vec<_>>>()?;

    // The `#[arg]` attributes are ours; the compiler doesn't know them
    function.sig.inputs.iter_mut().for_each(|input| {
        if let FnArg::Typed(arg) = input {
            arg.attrs.retain(|attr| !attr.path().is_ident("arg"));
        }
    });

    let fn_ident = IdentString::new(&function.sig.ident);
    let vis = &function.vis;
    let command_ident = format_ident!("{}_command", fn_ident.raw());

    let name = match attr.name {
        Some(name) if name.is_empty() => {
            return Err(syn::Error::new(name.span(), "command names can't be empty"));
        }
        Some(name) => (*name).clone(),
        None => fn_ident.as_str().to_owned(),
    };

    let docs = compute_docs(&function.attrs)?;
    let doc = format!(
        " Build the command line `fncli::Function` for [`{}`].",
        fn_ident.as_str()
    );

    // Hygienic, so they can't collide with parameter names
    let call = Ident::new("call", Span::mixed_site());
    let reader = Ident::new("reader", Span::mixed_site());

    let descriptors = infos.iter().map(ParamInfo::descriptor);
    let reads = infos.iter().map(|info| info.read(&reader));
    let arguments = infos.iter().map(|info| &info.ident);

    let builder = quote! {
        #[doc = #doc]
        #vis fn #command_ident()
            -> ::core::result::Result<::fncli::Function, ::fncli::ConfigError>
        {
            let signature = ::fncli::Signature::new([#(#descriptors),*])?;

            ::core::result::Result::Ok(
                ::fncli::Function::new(
                    #name,
                    signature,
                    move |#call: ::fncli::BoundCall| -> ::core::result::Result<
                        ::core::option::Option<::fncli::Value>,
                        ::fncli::CallError,
                    > {
                        #[allow(unused_mut, unused_variables)]
                        let mut #reader = #call.reader();
                        #(#reads)*

                        ::fncli::IntoOutput::into_output(#fn_ident(#(#arguments),*))
                            .map_err(::fncli::CallError::Failed)
                    },
                )
                .with_description(#docs),
            )
        }
    };

    let mut output = function.into_token_stream();
    output.extend(builder);
    Ok(output)
}
