//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Item found between an element's start and end tags
#[derive(Debug, Clone)]
enum Content {
    Element(XmlElement),
    CharData,
}

/// Parse dictionary XML into a generic element tree
pub fn parse(input: &str) -> Result<XmlDocument, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn document_parser<'a, I>() -> impl Parser<'a, I, XmlDocument, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let name = select! {
        Token::Name(n) => n,
    }
    .labelled("name");

    let quoted = select! {
        Token::String(s) => s,
    }
    .labelled("quoted value");

    let attribute = name
        .clone()
        .then_ignore(just(Token::Equals))
        .then(quoted)
        .map_with(|(name, value), e| XmlAttribute {
            name,
            value,
            span: span_range(&e.span()),
        });

    // Anything that does not start a tag is character data
    let char_data = none_of([Token::TagOpen, Token::CloseTagOpen]).to(Content::CharData);

    let element = recursive(|element| {
        let start_tag = just(Token::TagOpen)
            .ignore_then(name.clone())
            .then(attribute.repeated().collect::<Vec<_>>());

        let content = choice((element.map(Content::Element), char_data))
            .repeated()
            .collect::<Vec<_>>();

        let end_tag = just(Token::CloseTagOpen)
            .ignore_then(name)
            .then_ignore(just(Token::TagClose));

        let body = just(Token::TagClose).ignore_then(content).then(end_tag);

        start_tag
            .then(choice((
                just(Token::SelfClose).to(None::<(Vec<Content>, String)>),
                body.map(Some),
            )))
            .try_map(|((tag, attributes), body), span: SimpleSpan| match body {
                None => Ok(XmlElement {
                    name: tag,
                    attributes,
                    children: Vec::new(),
                    span: span_range(&span),
                }),
                Some((_, closing)) if closing != tag => Err(Rich::custom(
                    span,
                    format!(
                        "closing tag '</{}>' does not match opening tag '<{}>'",
                        closing, tag
                    ),
                )),
                Some((content, _)) => Ok(XmlElement {
                    name: tag,
                    attributes,
                    children: content
                        .into_iter()
                        .filter_map(|item| match item {
                            Content::Element(child) => Some(child),
                            Content::CharData => None,
                        })
                        .collect(),
                    span: span_range(&span),
                }),
            })
    });

    element.then_ignore(end()).map(|root| XmlDocument { root })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_empty_element() {
        let doc = parse("<IdDictionary/>").expect("Should parse");
        assert_eq!(doc.root.name, "IdDictionary");
        assert!(doc.root.attributes.is_empty());
        assert!(doc.root.children.is_empty());
    }

    #[test]
    fn test_attributes_keep_document_order() {
        let doc = parse(r#"<region group="Reg_GTower" eta0="0.0" deta="0.2"/>"#)
            .expect("Should parse");
        let names: Vec<_> = doc.root.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["group", "eta0", "deta"]);
        assert_eq!(doc.root.attribute("deta"), Some("0.2"));
        assert_eq!(doc.root.attribute("dphi"), None);
    }

    #[test]
    fn test_nested_children() {
        let input = r#"
            <IdDictionary name="Calorimeter">
                <field name="GTsampling">
                    <label name="EM" value="0"/>
                    <label name="Had" value="1"/>
                </field>
                <subregion name="GTower">
                    <range field="GTsampling" minvalue="0" maxvalue="1"/>
                </subregion>
            </IdDictionary>
        "#;
        let doc = parse(input).expect("Should parse");
        assert_eq!(doc.root.children.len(), 2);

        let field = &doc.root.children[0];
        assert_eq!(field.name, "field");
        assert_eq!(field.children_named("label").count(), 2);

        let subregion = &doc.root.children[1];
        assert_eq!(subregion.attribute("name"), Some("GTower"));
        assert_eq!(subregion.children[0].attribute("maxvalue"), Some("1"));
    }

    #[test]
    fn test_comments_and_character_data_ignored() {
        let input = r#"<?xml version="1.0"?>
            <IdDictionary>
                <!-- trigger towers -->
                free text 1.0
                <field name="JTsampling"/>
            </IdDictionary>"#;
        let doc = parse(input).expect("Should parse");
        assert_eq!(doc.root.children.len(), 1);
        assert_eq!(doc.root.children[0].attribute("name"), Some("JTsampling"));
    }

    #[test]
    fn test_element_span_covers_tag() {
        let input = r#"<a><b x="1"/></a>"#;
        let doc = parse(input).expect("Should parse");
        assert_eq!(doc.root.span, 0..input.len());
        assert_eq!(&input[doc.root.children[0].span.clone()], r#"<b x="1"/>"#);
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let result = parse("<region></subregion>");
        let errors = result.expect_err("Should fail");
        assert!(errors[0].to_string().contains("does not match"));
    }

    #[test]
    fn test_unclosed_element() {
        assert!(parse("<region group=\"x\">").is_err());
    }

    #[test]
    fn test_missing_attribute_value() {
        assert!(parse("<region group/>").is_err());
    }

    #[test]
    fn test_trailing_content_rejected() {
        assert!(parse("<a/><b/>").is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(parse("").is_err());
    }
}
