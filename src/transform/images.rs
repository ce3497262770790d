use crate::book::RESOURCES_DIR;
use crate::html::{detach, find_elements_by_name, get_attribute, set_attribute};
use crate::resources::{ResourceNames, ResourceResolver};
use anyhow::Result;
use markup5ever_rcdom::Handle;
use std::path::PathBuf;

/// An image of a chapter, resolved to a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    pub path: PathBuf,
    /// File name under the resources directory
    pub name: String,
}

/// Resolve every `<img>` of the section and point it at the bundled copy.
///
/// Sources are resolved concurrently. Images that cannot be resolved are
/// removed with a warning.
pub fn localize_images(
    section: &Handle,
    resolver: &ResourceResolver,
    names: &mut ResourceNames,
) -> Vec<LocalImage> {
    let images: Vec<(Handle, String)> = find_elements_by_name(section, "img")
        .into_iter()
        .filter_map(|img| {
            let src = get_attribute(&img, "src")?;
            let src = src.trim().to_string();
            (!src.is_empty() && !src.starts_with("data:")).then_some((img, src))
        })
        .collect();
    if images.is_empty() {
        return Vec::new();
    }

    let sources: Vec<&str> = images.iter().map(|(_, src)| src.as_str()).collect();
    let resolved: Vec<Result<PathBuf>> = std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|src| scope.spawn(move || resolver.resolve(src)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("image resolution panicked")))
            })
            .collect()
    });

    let mut local = Vec::new();
    for ((img, src), result) in images.into_iter().zip(resolved) {
        match result {
            Ok(path) => {
                let (name, _) = names.register(&path);
                set_attribute(&img, "src", &format!("../{RESOURCES_DIR}/{name}"));
                local.push(LocalImage { path, name });
            }
            Err(e) => {
                log::warn!("Skipping image {src}: {e:#}");
                detach(&img);
            }
        }
    }
    local
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::html::{inner_xhtml, parse_element};
    use crate::resources::test::StaticFetcher;
    use crate::resources::TEMP_DIR;

    fn section(html: &str) -> Handle {
        parse_element(&format!("<section>{html}</section>")).unwrap()
    }

    #[test]
    fn remote_image_becomes_one_resource() {
        let vault = tempfile::tempdir().unwrap();
        let resolver = ResourceResolver::new(
            vault.path().to_path_buf(),
            vault.path().join(TEMP_DIR),
            Box::new(StaticFetcher::serving(b"png")),
        );
        let s = section(r#"<p><img src="https://example.com/a.png"></p>"#);
        let mut names = ResourceNames::default();

        let images = localize_images(&s, &resolver, &mut names);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].name, "a.png");
        assert_eq!(inner_xhtml(&s), r#"<p><img src="../resources/a.png" /></p>"#);
    }

    #[test]
    fn unresolvable_images_are_dropped() {
        let vault = tempfile::tempdir().unwrap();
        std::fs::write(vault.path().join("here.png"), b"x").unwrap();
        let resolver = ResourceResolver::new(
            vault.path().to_path_buf(),
            vault.path().join(TEMP_DIR),
            Box::new(StaticFetcher::failing()),
        );
        let s = section(concat!(
            r#"<p><img src="https://example.com/gone.png"></p>"#,
            r#"<p><img src="here.png" alt="here"></p>"#,
            r#"<p><img src="data:image/png;base64,AAAA"></p>"#,
        ));
        let mut names = ResourceNames::default();

        let images = localize_images(&s, &resolver, &mut names);
        assert_eq!(images.len(), 1);
        assert_eq!(
            inner_xhtml(&s),
            concat!(
                "<p></p>",
                r#"<p><img src="../resources/here.png" alt="here" /></p>"#,
                r#"<p><img src="data:image/png;base64,AAAA" /></p>"#,
            )
        );
    }
}
