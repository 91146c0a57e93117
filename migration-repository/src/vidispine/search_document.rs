//! Serialisation of a `SearchQuery` into a Vidispine `ItemSearchDocument`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::errors::SourceError;
use migration_shared::SearchQuery;

const VIDISPINE_NAMESPACE: &str = "http://xml.vidispine.com/schema/vidispine";

/// Render the query as the XML body of a search request.
///
/// Each field becomes a `<field>` with one `<name>` and a `<value>` per value,
/// in the query's field order.
pub fn search_document_xml(query: &SearchQuery) -> Result<String, SourceError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write(
        &mut writer,
        Event::Start(BytesStart::new("ItemSearchDocument").with_attributes([("xmlns", VIDISPINE_NAMESPACE)])),
    )?;

    for (name, values) in query.fields() {
        write(&mut writer, Event::Start(BytesStart::new("field")))?;
        write_text_element(&mut writer, "name", name)?;
        for value in values {
            write_text_element(&mut writer, "value", value)?;
        }
        write(&mut writer, Event::End(BytesEnd::new("field")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("ItemSearchDocument")))?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| SourceError::transport(format!("Search document is not UTF-8: {}", e)))
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: &str,
) -> Result<(), SourceError> {
    write(writer, Event::Start(BytesStart::new(tag)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(tag)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SourceError> {
    writer
        .write_event(event)
        .map_err(|e| SourceError::transport(format!("Failed to build search document: {}", e)))
}
