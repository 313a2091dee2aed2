use std::{fmt::Write as _, path::Path};

use quick_xml::{Reader, escape::escape, events::Event};

use super::{ConfigEvents, ConfigFormat, OptionsHandler, ROOT_ELEMENT, read_file, write_file};
use crate::{
    container::OptionsCont,
    error::{OptionsError, Result},
};

/// XML configurations: `<configuration><name>value</name>...</configuration>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlConfig {
    accept_unknown: bool,
}

impl XmlConfig {
    pub fn new(accept_unknown: bool) -> Self {
        Self { accept_unknown }
    }
}

impl ConfigFormat for XmlConfig {
    fn load_file(&self, into: &mut OptionsCont, path: &Path) -> Result<()> {
        let content = read_file(path)?;
        let mut handler = OptionsHandler::new(into, self.accept_unknown);
        read_xml_events(&content, path, &mut handler)
    }

    fn write_configuration(&self, path: &Path, options: &OptionsCont) -> Result<()> {
        let mut out = format!("<{ROOT_ELEMENT}>\n");
        for (id, option) in options.iter() {
            if !option.is_set() || option.is_default() {
                continue;
            }
            let (Some(name), Some(value)) = (options.primary_name(id), option.value_as_string())
            else {
                continue;
            };
            let _ = writeln!(out, "   <{name}>{}</{name}>", escape(value.as_str()));
        }
        let _ = writeln!(out, "</{ROOT_ELEMENT}>");
        write_file(path, &out)
    }

    fn write_template(&self, path: &Path, options: &OptionsCont) -> Result<()> {
        let mut out = format!("<{ROOT_ELEMENT}>\n");
        for name in options.iter().filter_map(|(id, _)| options.primary_name(id)) {
            let _ = writeln!(out, "   <{name}></{name}>");
        }
        let _ = writeln!(out, "</{ROOT_ELEMENT}>");
        write_file(path, &out)
    }
}

/// Feeds the elements and text of an XML document to `events`.
///
/// `path` is only used for error reporting.
pub fn read_xml_events(content: &str, path: &Path, events: &mut dyn ConfigEvents) -> Result<()> {
    let malformed = |message: String| OptionsError::Xml {
        path: path.to_path_buf(),
        message,
    };
    let mut reader = Reader::from_str(content);
    loop {
        let event = reader.read_event().map_err(|e| {
            malformed(format!(
                "{e} (at byte {})",
                reader.error_position()
            ))
        })?;
        match event {
            Event::Start(element) => {
                let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                events.on_element_start(&name)?;
            }
            Event::Empty(element) => {
                let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                events.on_element_start(&name)?;
                events.on_element_end(&name)?;
            }
            Event::End(element) => {
                let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                events.on_element_end(&name)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| malformed(e.to_string()))?;
                events.on_text(&text)?;
            }
            Event::CData(data) => {
                events.on_text(&String::from_utf8_lossy(&data))?;
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::TypedOption;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl ConfigEvents for Recorder {
        fn on_element_start(&mut self, name: &str) -> Result<()> {
            self.0.push(format!("<{name}"));
            Ok(())
        }

        fn on_text(&mut self, text: &str) -> Result<()> {
            if !text.trim().is_empty() {
                self.0.push(text.to_string());
            }
            Ok(())
        }
    }

    fn options() -> OptionsCont {
        let mut options = OptionsCont::new();
        options
            .add_with_abbr("name", 'n', TypedOption::string_default("World"))
            .unwrap();
        options.add("repeat", TypedOption::int()).unwrap();
        options.add("ratio", TypedOption::double_default(0.5)).unwrap();
        options
    }

    #[test]
    fn test_events_in_document_order() {
        let mut recorder = Recorder::default();
        read_xml_events(
            "<?xml version=\"1.0\"?>\n<configuration>\n  <!-- note -->\n  <name>Grace &amp; Co</name>\n  <repeat/>\n  <ratio><![CDATA[0.25]]></ratio>\n</configuration>\n",
            Path::new("inline.xml"),
            &mut recorder,
        )
        .unwrap();
        assert_eq!(
            recorder.0,
            vec![
                "<configuration",
                "<name",
                "Grace & Co",
                "<repeat",
                "<ratio",
                "0.25"
            ]
        );
    }

    #[test]
    fn test_malformed_document() {
        let mut recorder = Recorder::default();
        let err = read_xml_events(
            "<configuration><name>x</repeat></configuration>",
            Path::new("broken.xml"),
            &mut recorder,
        )
        .unwrap_err();
        assert!(matches!(err, OptionsError::Xml { path, .. } if path == Path::new("broken.xml")));
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.xml");
        fs::write(
            &path,
            "<configuration>\n   <name>Grace</name>\n   <repeat>3</repeat>\n</configuration>\n",
        )
        .unwrap();
        let mut options = options();
        XmlConfig::default().load_file(&mut options, &path).unwrap();
        assert_eq!(options.get_string("name").unwrap(), "Grace");
        assert_eq!(options.get_int("repeat").unwrap(), 3);
    }

    #[test]
    fn test_load_ignores_text_under_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.xml");
        fs::write(&path, "<configuration>notes<name>Grace</name></configuration>").unwrap();
        let mut options = options();
        XmlConfig::default().load_file(&mut options, &path).unwrap();
        assert_eq!(options.get_string("name").unwrap(), "Grace");
    }

    #[test]
    fn test_load_rejects_unknown_unless_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.xml");
        fs::write(&path, "<configuration><colour>red</colour></configuration>").unwrap();
        let mut options = options();
        assert!(matches!(
            XmlConfig::new(false).load_file(&mut options, &path),
            Err(OptionsError::UnknownOption(name)) if name == "colour"
        ));
        XmlConfig::new(true).load_file(&mut options, &path).unwrap();
    }

    #[test]
    fn test_write_configuration_skips_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xml");
        let mut options = options();
        options.set("repeat", "2").unwrap();
        options.set("n", "<Ada>").unwrap();
        XmlConfig::default()
            .write_configuration(&path, &options)
            .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<configuration>\n   <name>&lt;Ada&gt;</name>\n   <repeat>2</repeat>\n</configuration>\n"
        );

        let mut reloaded = self::options();
        XmlConfig::default().load_file(&mut reloaded, &path).unwrap();
        assert_eq!(reloaded.get_string("name").unwrap(), "<Ada>");
        assert_eq!(reloaded.get_int("repeat").unwrap(), 2);
    }

    #[test]
    fn test_write_template_lists_every_option() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("template.xml");
        XmlConfig::default()
            .write_template(&path, &options())
            .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<configuration>\n   <name></name>\n   <repeat></repeat>\n   <ratio></ratio>\n</configuration>\n"
        );
    }
}
