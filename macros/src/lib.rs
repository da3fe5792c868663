//! Proc macros for trellis: `view!` RSX composition.
//!
//! This crate is not meant to be used directly. Enable the `macros` feature on `trellis`.

use proc_macro::TokenStream;

mod view_macro;

/// RSX-style component composition macro.
///
/// Expands to a `Vec<trellis::component::Child>`.
///
/// # Syntax
///
/// - `<Tag />`: self-closing element (no children)
/// - `<Tag attr="val"> ... </Tag>`: element with children
/// - CamelCase tags are UI library elements: `<DatePicker>` becomes `el-date-picker`
/// - lowercase tags are raw HTML: `<div>`, `<h1>`
///
/// # Attributes
///
/// - `name="literal"` or `name={expr}`; a bare `name` means `true`
/// - names may contain hyphens: `show-password`, `model-value`
/// - `id`, `class` and `style` are handled by `Node::with_attrs`
/// - `on_<event>={handler}` binds a server handler, `on_<event>="code"` a client script
///
/// # Children
///
/// Nested elements, string literals, and `{expr}` blocks of anything that
/// converts into a `Child`.
///
/// # Example
///
/// ```ignore
/// view! {
///     <div class="counter">
///         <span id="label">"Count: " {count}</span>
///         <Button id="inc" type="primary" on_click={increment}>"+1"</Button>
///     </div>
/// }
/// ```
#[proc_macro]
pub fn view(input: TokenStream) -> TokenStream {
    view_macro::view_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
