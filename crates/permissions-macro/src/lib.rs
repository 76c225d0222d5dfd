//! # Permissions Macro
//!
//! `#[with_permission(...)]` guards a directory service function with a
//! caller permission check. The check is the first statement of the body, so
//! it runs before any validation or database access.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    spanned::Spanned,
    Expr,
    FnArg,
    Ident,
    ItemFn,
    Pat,
    Token,
};

/// How the listed permissions combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Every permission is required
    All,
    /// One granted permission is enough
    Any,
}

/// Parsed attribute arguments: `[all = | any =] perm, perm, ...`
#[derive(Debug)]
struct Guard {
    mode:        Mode,
    permissions: Vec<Expr>,
}

impl Parse for Guard {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut mode = Mode::All;

        if input.peek(Ident) && input.peek2(Token![=]) {
            let keyword: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            mode = match keyword.to_string().as_str() {
                "all" => Mode::All,
                "any" => Mode::Any,
                other => {
                    return Err(syn::Error::new(
                        keyword.span(),
                        format!("unknown mode `{}`, expected `all` or `any`", other),
                    ))
                },
            };
        }

        let permissions: Vec<Expr> = Punctuated::<Expr, Token![,]>::parse_terminated(input)?
            .into_iter()
            .collect();
        if permissions.is_empty() {
            return Err(input.error("at least one permission is required"));
        }

        Ok(Self {
            mode,
            permissions,
        })
    }
}

impl Guard {
    /// Statement that returns Forbidden from the enclosing function
    fn check(&self) -> TokenStream2 {
        let permissions = &self.permissions;
        let method = match self.mode {
            Mode::All => quote!(require_all),
            Mode::Any => quote!(require_any),
        };

        quote! {
            auth::Caller::#method(caller, &[#(#permissions),*])?;
        }
    }
}

/// Whether the function takes an argument bound to the name `caller`
fn has_caller_arg(function: &ItemFn) -> bool {
    function.sig.inputs.iter().any(|arg| {
        match arg {
            FnArg::Typed(typed) => matches!(&*typed.pat, Pat::Ident(p) if p.ident == "caller"),
            FnArg::Receiver(_) => false,
        }
    })
}

/// Guard a service function with a permission check.
///
/// The function needs a `caller: &Caller` argument and must return
/// `error::Result<_>`; the calling crate depends on `auth`.
///
/// Without a mode every listed permission is required; `any =` accepts the
/// call when one of them is granted.
///
/// ```ignore
/// use auth::{Caller, Permission, ProductAction, TeamAction};
/// use error::Result;
/// use permissions_macro::with_permission;
///
/// #[with_permission(Permission::Teams(TeamAction::MembersAdd))]
/// pub async fn add_members(&self, caller: &Caller, team_id: i32, ids: Vec<i32>) -> Result<()> {
///     Ok(())
/// }
///
/// #[with_permission(any = Permission::Products(ProductAction::Read), Permission::Teams(TeamAction::Read))]
/// pub async fn product_teams(&self, caller: &Caller, product_id: i32) -> Result<Vec<i32>> {
///     Ok(Vec::new())
/// }
/// ```
#[proc_macro_attribute]
pub fn with_permission(args: TokenStream, input: TokenStream) -> TokenStream {
    let guard = parse_macro_input!(args as Guard);
    let mut function = parse_macro_input!(input as ItemFn);

    if !has_caller_arg(&function) {
        return syn::Error::new(
            function.sig.span(),
            "#[with_permission] needs a `caller` argument",
        )
        .to_compile_error()
        .into();
    }

    let check = guard.check();
    let body = &function.block;
    function.block = Box::new(syn::parse_quote!({
        #check
        #body
    }));

    quote!(#function).into()
}
