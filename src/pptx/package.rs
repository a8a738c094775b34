//! Serialise a [`SlideDeck`] as a `.pptx` (OOXML/OPC ZIP) package.
//!
//! The package is assembled entirely in memory and only then written to a
//! temporary file next to the destination, which is renamed into place.
//! A failed save therefore never leaves a truncated deck at the target path,
//! and the temporary file is removed when its handle drops.

use super::template::{self, content_type as ct, rel};
use super::{Slide, SlideDeck};
use std::io::{self, BufWriter, Cursor, Seek, Write};
use std::path::Path;
use tracing::{debug, trace};
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Relationship ids in `presentation.xml.rels` before the first slide.
const FIXED_PRESENTATION_RELS: usize = 5;

impl SlideDeck {
    /// Write the complete package to `writer`, returning it once finished.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> ZipResult<W> {
        let mut zip = ZipWriter::new(writer);
        let xml = CompressionMethod::Deflated;
        let media = CompressionMethod::Stored;

        put(&mut zip, "[Content_Types].xml", content_types_xml(self).as_bytes(), xml)?;
        put(&mut zip, "_rels/.rels", root_rels_xml().as_bytes(), xml)?;
        put(&mut zip, "docProps/core.xml", core_props_xml(self).as_bytes(), xml)?;
        put(&mut zip, "docProps/app.xml", app_props_xml(self).as_bytes(), xml)?;
        put(&mut zip, "ppt/presentation.xml", presentation_xml(self).as_bytes(), xml)?;
        put(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            presentation_rels_xml(self).as_bytes(),
            xml,
        )?;
        put(&mut zip, "ppt/presProps.xml", template::PRES_PROPS_XML.as_bytes(), xml)?;
        put(&mut zip, "ppt/viewProps.xml", template::VIEW_PROPS_XML.as_bytes(), xml)?;
        put(&mut zip, "ppt/tableStyles.xml", template::TABLE_STYLES_XML.as_bytes(), xml)?;
        put(
            &mut zip,
            "ppt/slideMasters/slideMaster1.xml",
            template::SLIDE_MASTER_XML.as_bytes(),
            xml,
        )?;
        put(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            template::SLIDE_MASTER_RELS.as_bytes(),
            xml,
        )?;
        put(
            &mut zip,
            "ppt/slideLayouts/slideLayout1.xml",
            template::BLANK_LAYOUT_XML.as_bytes(),
            xml,
        )?;
        put(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            template::BLANK_LAYOUT_RELS.as_bytes(),
            xml,
        )?;
        put(&mut zip, "ppt/theme/theme1.xml", template::THEME_XML.as_bytes(), xml)?;

        for slide in &self.slides {
            let n = slide.number();
            put(
                &mut zip,
                &format!("ppt/slides/slide{n}.xml"),
                slide_xml(slide).as_bytes(),
                xml,
            )?;
            put(
                &mut zip,
                &format!("ppt/slides/_rels/slide{n}.xml.rels"),
                slide_rels_xml(slide).as_bytes(),
                xml,
            )?;
            if let Some(picture) = slide.picture() {
                put(&mut zip, &format!("ppt/media/image{n}.png"), &picture.png, media)?;
            }
        }

        zip.finish()
    }

    /// Serialise the package into memory.
    pub fn to_bytes(&self) -> ZipResult<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the package to `path` atomically and return its size in bytes.
    ///
    /// The parent directory must already exist.
    pub fn save(&self, path: &Path) -> io::Result<u64> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = tempfile::Builder::new()
            .prefix(".pdf2pptx-")
            .suffix(".tmp")
            .tempfile_in(dir)?;

        // Stream the archive straight into the staging file.
        let writer = self
            .write_to(BufWriter::new(staged.as_file_mut()))
            .map_err(io::Error::other)?;
        writer.into_inner().map_err(|e| e.into_error())?;

        let file = staged.as_file();
        file.sync_all()?;
        let written = file.metadata()?.len();
        debug!("Serialised {} slides into {} bytes", self.slide_count(), written);

        staged.persist(path).map_err(|e| e.error)?;
        Ok(written)
    }
}

fn put<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    body: &[u8],
    method: CompressionMethod,
) -> ZipResult<()> {
    trace!("part {name}: {} bytes", body.len());
    zip.start_file(name, SimpleFileOptions::default().compression_method(method))?;
    zip.write_all(body)?;
    Ok(())
}

// ── Generated parts ──────────────────────────────────────────────────────

fn content_types_xml(deck: &SlideDeck) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(template::XML_DECL);
    xml.push_str(&format!(r#"<Types xmlns="{}">"#, template::NS_CONTENT_TYPES));
    xml.push_str(&format!(
        r#"<Default Extension="rels" ContentType="{}"/>"#,
        ct::RELATIONSHIPS
    ));
    xml.push_str(&format!(r#"<Default Extension="xml" ContentType="{}"/>"#, ct::XML));
    xml.push_str(&format!(r#"<Default Extension="png" ContentType="{}"/>"#, ct::PNG));

    let fixed = [
        ("/ppt/presentation.xml", ct::PRESENTATION),
        ("/ppt/presProps.xml", ct::PRES_PROPS),
        ("/ppt/viewProps.xml", ct::VIEW_PROPS),
        ("/ppt/tableStyles.xml", ct::TABLE_STYLES),
        ("/ppt/slideMasters/slideMaster1.xml", ct::SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", ct::SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml", ct::THEME),
        ("/docProps/core.xml", ct::CORE_PROPERTIES),
        ("/docProps/app.xml", ct::EXTENDED_PROPERTIES),
    ];
    for (part, kind) in fixed {
        xml.push_str(&format!(r#"<Override PartName="{part}" ContentType="{kind}"/>"#));
    }
    for slide in &deck.slides {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{}"/>"#,
            slide.number(),
            ct::SLIDE
        ));
    }

    xml.push_str("</Types>");
    xml
}

fn relationships(entries: &[(String, &str, String)]) -> String {
    let mut xml = String::with_capacity(256 + entries.len() * 160);
    xml.push_str(template::XML_DECL);
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, template::NS_RELS));
    for (id, kind, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{kind}" Target="{target}"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn root_rels_xml() -> String {
    relationships(&[
        ("rId1".into(), rel::OFFICE_DOCUMENT, "ppt/presentation.xml".into()),
        ("rId2".into(), rel::CORE_PROPERTIES, "docProps/core.xml".into()),
        ("rId3".into(), rel::EXTENDED_PROPERTIES, "docProps/app.xml".into()),
    ])
}

/// Relationship id of the `index`-th (0-based) slide in `presentation.xml.rels`.
fn slide_rel_id(index: usize) -> String {
    format!("rId{}", FIXED_PRESENTATION_RELS + 1 + index)
}

fn presentation_rels_xml(deck: &SlideDeck) -> String {
    let mut entries = vec![
        ("rId1".to_string(), rel::SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string()),
        ("rId2".to_string(), rel::THEME, "theme/theme1.xml".to_string()),
        ("rId3".to_string(), rel::PRES_PROPS, "presProps.xml".to_string()),
        ("rId4".to_string(), rel::VIEW_PROPS, "viewProps.xml".to_string()),
        ("rId5".to_string(), rel::TABLE_STYLES, "tableStyles.xml".to_string()),
    ];
    for (index, slide) in deck.slides.iter().enumerate() {
        entries.push((
            slide_rel_id(index),
            rel::SLIDE,
            format!("slides/slide{}.xml", slide.number()),
        ));
    }
    relationships(&entries)
}

fn presentation_xml(deck: &SlideDeck) -> String {
    let mut xml = String::with_capacity(1024 + deck.slides.len() * 48);
    xml.push_str(template::XML_DECL);
    xml.push_str(&format!(
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        template::NS_A,
        template::NS_R,
        template::NS_P
    ));
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

    if !deck.slides.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for (index, slide) in deck.slides.iter().enumerate() {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                slide.id(),
                slide_rel_id(index)
            ));
        }
        xml.push_str("</p:sldIdLst>");
    }

    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}"/>"#,
        deck.width(),
        deck.height()
    ));
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

fn slide_xml(slide: &Slide) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(template::XML_DECL);
    xml.push_str(&format!(
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        template::NS_A,
        template::NS_R,
        template::NS_P
    ));
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(template::SP_TREE_HEADER);

    if let Some(picture) = slide.picture() {
        let b = picture.bounds;
        xml.push_str("<p:pic>");
        xml.push_str(&format!(
            r#"<p:nvPicPr><p:cNvPr id="2" name="Picture 1" descr="Page {}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>"#,
            slide.number()
        ));
        xml.push_str(r#"<p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#);
        xml.push_str("<p:spPr><a:xfrm>");
        xml.push_str(&format!(r#"<a:off x="{}" y="{}"/>"#, b.x, b.y));
        xml.push_str(&format!(r#"<a:ext cx="{}" cy="{}"/>"#, b.cx, b.cy));
        xml.push_str(r#"</a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#);
        xml.push_str("</p:pic>");
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

fn slide_rels_xml(slide: &Slide) -> String {
    let mut entries = vec![(
        "rId1".to_string(),
        rel::SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml".to_string(),
    )];
    if slide.picture().is_some() {
        entries.push((
            "rId2".to_string(),
            rel::IMAGE,
            format!("../media/image{}.png", slide.number()),
        ));
    }
    relationships(&entries)
}

fn core_props_xml(deck: &SlideDeck) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(template::XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    ));
    if let Some(title) = deck.title() {
        xml.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
    }
    xml.push_str("<dc:creator>pdf2pptx</dc:creator>");
    xml.push_str("</cp:coreProperties>");
    xml
}

fn app_props_xml(deck: &SlideDeck) -> String {
    let mut xml = String::with_capacity(384);
    xml.push_str(template::XML_DECL);
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
        r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
    ));
    xml.push_str("<Application>pdf2pptx</Application>");
    xml.push_str(&format!("<Slides>{}</Slides>", deck.slide_count()));
    xml.push_str("</Properties>");
    xml
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn deck_with(pages: usize) -> SlideDeck {
        let mut deck = SlideDeck::widescreen();
        let canvas = deck.canvas();
        for n in 0..pages {
            deck.add_blank_slide().place_image(vec![n as u8; 4], canvas);
        }
        deck
    }

    fn read_part(bytes: &[u8], name: &str) -> Vec<u8> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = Vec::new();
        file.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn presentation_lists_slides_in_order_with_canvas_size() {
        let xml = presentation_xml(&deck_with(3));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
        let first = xml.find(r#"id="256" r:id="rId6""#).unwrap();
        let second = xml.find(r#"id="257" r:id="rId7""#).unwrap();
        let third = xml.find(r#"id="258" r:id="rId8""#).unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn empty_deck_has_no_slide_list() {
        let xml = presentation_xml(&SlideDeck::widescreen());
        assert!(!xml.contains("sldIdLst"));
    }

    #[test]
    fn presentation_rels_point_at_each_slide() {
        let xml = presentation_rels_xml(&deck_with(2));
        assert!(xml.contains(r#"Id="rId6" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml""#));
        assert!(xml.contains(r#"Id="rId7""#));
        assert!(xml.contains(r#"Target="slides/slide2.xml""#));
    }

    #[test]
    fn slide_picture_fills_given_bounds() {
        let deck = deck_with(1);
        let xml = slide_xml(&deck.slides()[0]);
        assert!(xml.contains(r#"<a:off x="0" y="0"/>"#));
        assert!(xml.contains(r#"<a:ext cx="9144000" cy="5143500"/>"#));
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
        assert!(xml.contains("<a:stretch><a:fillRect/></a:stretch>"));
        assert_eq!(xml.matches("<p:pic>").count(), 1);
        assert!(!xml.contains("<p:sp>"));
    }

    #[test]
    fn slide_without_picture_has_no_image_relationship() {
        let mut deck = SlideDeck::widescreen();
        deck.add_blank_slide();
        let slide = &deck.slides()[0];
        assert!(!slide_xml(slide).contains("<p:pic>"));
        assert!(!slide_rels_xml(slide).contains("image"));
    }

    #[test]
    fn content_types_override_every_slide() {
        let xml = content_types_xml(&deck_with(2));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(xml.contains(r#"Extension="png""#));
    }

    #[test]
    fn core_props_escape_title() {
        let mut deck = SlideDeck::widescreen();
        deck.set_title("Q&A <draft>");
        let xml = core_props_xml(&deck);
        assert!(xml.contains("<dc:title>Q&amp;A &lt;draft&gt;</dc:title>"));
    }

    #[test]
    fn package_contains_media_per_slide() {
        let bytes = deck_with(2).to_bytes().unwrap();
        assert_eq!(read_part(&bytes, "ppt/media/image1.png"), vec![0u8; 4]);
        assert_eq!(read_part(&bytes, "ppt/media/image2.png"), vec![1u8; 4]);
        let app = String::from_utf8(read_part(&bytes, "docProps/app.xml")).unwrap();
        assert!(app.contains("<Slides>2</Slides>"));
    }

    #[test]
    fn saved_file_matches_in_memory_package() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("deck.pptx");
        let deck = deck_with(3);

        let written = deck.save(&out).unwrap();
        let on_disk = std::fs::read(&out).unwrap();
        assert_eq!(on_disk.len() as u64, written);

        let in_memory = deck.to_bytes().unwrap();
        let names = |bytes: &[u8]| {
            let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
            archive.file_names().map(str::to_string).collect::<Vec<_>>()
        };
        assert_eq!(names(&on_disk), names(&in_memory));
        assert_eq!(read_part(&on_disk, "ppt/media/image3.png"), vec![2u8; 4]);
        assert_eq!(
            read_part(&on_disk, "ppt/slides/slide3.xml"),
            read_part(&in_memory, "ppt/slides/slide3.xml")
        );
    }

    #[test]
    fn save_writes_file_and_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("deck.pptx");

        let written = deck_with(1).save(&out).unwrap();
        assert_eq!(std::fs::metadata(&out).unwrap().len(), written);

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("deck.pptx")]);
    }

    #[test]
    fn save_into_missing_directory_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no/such/dir/deck.pptx");
        assert!(deck_with(1).save(&out).is_err());
        assert!(!out.exists());
    }
}
