//! User agent default styles.
//!
//! [HTML Living Standard § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//! defines the default CSS styles for HTML elements. Only the properties the
//! layout tree classifies on are covered.

use trellis_dom::{ElementData, Namespace};

/// The UA declaration block for an element, applied before author rules.
pub fn user_agent_declarations(element: &ElementData) -> &'static str {
    if element.namespace == Namespace::Svg {
        // [SVG 2 § 5.1](https://www.w3.org/TR/SVG2/struct.html)
        // Only the outermost svg element participates in CSS box layout.
        return if element.is_svg_root() { "display: inline" } else { "display: block" };
    }
    let tag_name = element.tag_name.as_str();

    // [§ 15.3.1 Hidden elements]
    // "The following elements must have their display set to none:"
    if matches!(
        tag_name,
        "area"
            | "base"
            | "basefont"
            | "datalist"
            | "head"
            | "link"
            | "meta"
            | "noembed"
            | "noframes"
            | "param"
            | "rp"
            | "script"
            | "style"
            | "template"
            | "title"
    ) {
        return "display: none";
    }

    // [§ 15.3.3 Flow content]
    if matches!(
        tag_name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "body"
            | "center"
            | "dd"
            | "details"
            | "dialog"
            | "dir"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "header"
            | "hgroup"
            | "hr"
            | "html"
            | "legend"
            | "listing"
            | "main"
            | "menu"
            | "nav"
            | "p"
            | "plaintext"
            | "pre"
            | "search"
            | "section"
            | "summary"
            | "xmp"
    ) {
        return "display: block";
    }

    match tag_name {
        // [§ 15.3.6 Sections and headings]
        "h1" => "display: block; font-size: 2em; font-weight: bold",
        "h2" => "display: block; font-size: 1.5em; font-weight: bold",
        "h3" | "h4" | "h5" | "h6" => "display: block; font-weight: bold",
        // [§ 15.3.7 Lists]
        // "li { display: list-item; }"
        "ol" => "display: block; list-style-type: decimal; padding-left: 40px",
        "ul" => "display: block; list-style-type: disc; padding-left: 40px",
        "li" => "display: list-item",
        // [§ 15.3.8 Tables]
        "table" => "display: table",
        // [§ 15.3.4 Phrasing content]
        "b" | "strong" => "font-weight: bold",
        "i" | "em" => "font-style: italic",
        // Form controls are inline-block by default.
        "input" | "button" | "textarea" | "select" => "display: inline-block",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_by_tag() {
        assert_eq!(user_agent_declarations(&ElementData::html("div")), "display: block");
        assert_eq!(user_agent_declarations(&ElementData::html("head")), "display: none");
        assert_eq!(user_agent_declarations(&ElementData::html("li")), "display: list-item");
        assert_eq!(user_agent_declarations(&ElementData::html("span")), "");
        assert_eq!(user_agent_declarations(&ElementData::svg("rect")), "display: block");
    }
}
