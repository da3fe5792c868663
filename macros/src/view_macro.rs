//! RSX view! macro: parse JSX-like syntax and generate trellis node code.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{braced, Error, Expr, Ident, Lit, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// An attribute value: a literal, a braced expression, or a bare flag.
#[derive(Clone)]
pub(crate) enum AttrValue {
    Lit(Lit),
    Expr(Expr),
    Flag,
}

/// A parsed RSX attribute: `name="value"`, `name={expr}`, or `name`.
#[derive(Clone)]
pub(crate) struct Attribute {
    pub name: String,
    pub span: Span,
    pub value: AttrValue,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match &self.value {
            AttrValue::Lit(_) => "literal",
            AttrValue::Expr(_) => "expr",
            AttrValue::Flag => "flag",
        };
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("value", &value)
            .finish()
    }
}

/// A child entry inside an element or at the top level.
#[derive(Clone)]
pub(crate) enum Item {
    Element(Element),
    Text(LitStr),
    Expr(Expr),
}

impl std::fmt::Debug for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element(element) => element.fmt(f),
            Self::Text(text) => write!(f, "Text({:?})", text.value()),
            Self::Expr(_) => f.write_str("Expr"),
        }
    }
}

/// A parsed RSX element: `<Tag attrs... />` or `<Tag attrs...> children </Tag>`.
#[derive(Clone)]
pub(crate) struct Element {
    pub tag: Ident,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Item>,
    pub self_closing: bool,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag.to_string())
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .field("self_closing", &self.self_closing)
            .finish()
    }
}

impl Element {
    /// CamelCase tags name UI library elements.
    fn is_library_element(&self) -> bool {
        self.tag
            .to_string()
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase())
    }
}

/// The top-level view! input: a sequence of items.
#[derive(Debug)]
struct ViewInput {
    items: Vec<Item>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for ViewInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut items = Vec::new();
        while !input.is_empty() {
            items.push(parse_item(input)?);
        }
        Ok(ViewInput { items })
    }
}

/// Parse one child: an element, a string literal, or a braced expression.
fn parse_item(input: ParseStream) -> Result<Item> {
    if input.peek(Token![<]) {
        return parse_element(input).map(Item::Element);
    }
    if input.peek(LitStr) {
        return input.parse().map(Item::Text);
    }
    if input.peek(syn::token::Brace) {
        let content;
        braced!(content in input);
        return content.parse().map(Item::Expr);
    }
    Err(input.error("expected an element, a string literal, or a `{expr}` block"))
}

/// Parse an attribute name, allowing keywords and hyphenated segments.
fn parse_attr_name(input: ParseStream) -> Result<(String, Span)> {
    let first = Ident::parse_any(input)?;
    let span = first.span();
    let mut name = first.to_string();
    while input.peek(Token![-]) {
        input.parse::<Token![-]>()?;
        let segment = Ident::parse_any(input)?;
        name.push('-');
        name.push_str(&segment.to_string());
    }
    Ok((name, span))
}

fn parse_attr_value(input: ParseStream) -> Result<AttrValue> {
    if !input.peek(Token![=]) {
        return Ok(AttrValue::Flag);
    }
    input.parse::<Token![=]>()?;
    if input.peek(syn::token::Brace) {
        let content;
        braced!(content in input);
        return content.parse().map(AttrValue::Expr);
    }
    let lit: Lit = input.parse()?;
    match lit {
        Lit::Str(_) | Lit::Int(_) | Lit::Float(_) | Lit::Bool(_) => Ok(AttrValue::Lit(lit)),
        other => Err(Error::new(
            other.span(),
            "attribute literals must be strings, numbers, or booleans",
        )),
    }
}

/// Parse a single RSX element from the token stream.
pub(crate) fn parse_element(input: ParseStream) -> Result<Element> {
    input.parse::<Token![<]>()?;
    let tag = Ident::parse_any(input)?;

    // Attributes until `/>` or `>`.
    let mut attrs = Vec::new();
    loop {
        if input.peek(Token![/]) {
            input.parse::<Token![/]>()?;
            input.parse::<Token![>]>()?;
            return Ok(Element {
                tag,
                attrs,
                children: Vec::new(),
                self_closing: true,
            });
        }

        if input.peek(Token![>]) {
            input.parse::<Token![>]>()?;
            break;
        }

        let (name, span) = parse_attr_name(input)?;
        let value = parse_attr_value(input)?;
        attrs.push(Attribute { name, span, value });
    }

    // Children until the closing tag.
    let mut children = Vec::new();
    loop {
        if input.is_empty() {
            return Err(Error::new(tag.span(), format!("unclosed element `<{tag}>`")));
        }

        if input.peek(Token![<]) && input.peek2(Token![/]) {
            input.parse::<Token![<]>()?;
            input.parse::<Token![/]>()?;
            let closing_tag = Ident::parse_any(input)?;
            if closing_tag != tag {
                return Err(Error::new(
                    closing_tag.span(),
                    format!(
                        "mismatched closing tag: expected `</{}>`, found `</{}>`",
                        tag, closing_tag
                    ),
                ));
            }
            input.parse::<Token![>]>()?;
            break;
        }

        children.push(parse_item(input)?);
    }

    Ok(Element {
        tag,
        attrs,
        children,
        self_closing: false,
    })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// `DatePicker` -> `date-picker`.
pub(crate) fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn generate_attr(attr: &Attribute) -> TokenStream {
    let name = LitStr::new(&attr.name, attr.span);
    let value = match &attr.value {
        AttrValue::Lit(lit) => quote! { #lit },
        AttrValue::Expr(expr) => quote! { #expr },
        AttrValue::Flag => quote! { true },
    };
    quote! { (#name, ::trellis::component::Attr::from(#value)) }
}

/// Generate a `Node` expression for a single element.
fn generate_element(elem: &Element) -> TokenStream {
    let tag = elem.tag.to_string();
    let kind = if elem.is_library_element() {
        let name = LitStr::new(&kebab_case(&tag), elem.tag.span());
        quote! { ::trellis::component::NodeKind::Element(::std::string::String::from(#name)) }
    } else {
        let name = LitStr::new(&tag, elem.tag.span());
        quote! { ::trellis::component::NodeKind::Html(::std::string::String::from(#name)) }
    };

    let attrs = elem.attrs.iter().map(generate_attr);
    let children = elem.children.iter().map(|child| {
        let code = generate_item(child);
        quote! { .child(#code) }
    });

    quote! {
        ::trellis::component::Node::with_attrs(
            #kind,
            ::std::vec::Vec::<(&'static str, ::trellis::component::Attr)>::from([#(#attrs),*]),
        )
        #(#children)*
    }
}

/// Generate a `Child` expression for one item.
fn generate_item(item: &Item) -> TokenStream {
    match item {
        Item::Element(element) => {
            let node = generate_element(element);
            quote! { ::trellis::component::Child::from(#node) }
        }
        Item::Text(text) => quote! { ::trellis::component::Child::from(#text) },
        Item::Expr(expr) => quote! { ::trellis::component::Child::from(#expr) },
    }
}

/// Entry point: generate code for the entire view! macro.
pub(crate) fn view_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: ViewInput = syn::parse2(input)?;

    if parsed.items.is_empty() {
        return Err(Error::new(
            Span::call_site(),
            "view! macro requires at least one element",
        ));
    }

    let items = parsed.items.iter().map(generate_item);

    Ok(quote! {
        ::std::vec::Vec::<::trellis::component::Child>::from([#(#items),*])
    })
}

// ===========================================================================
// Tests
// ===========================================================================
