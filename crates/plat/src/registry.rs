//! The resolver every command opens files with.

use std::sync::Arc;

use plat_core::{FileKind, Registry};
use plat_cri::CpkParser;
use plat_dat::DatParser;
use plat_pkz::PkzParser;

/// A [`Registry`] opening DAT, PKZ and CPK archives with their default options.
///
/// Every other kind of file is kept as raw data.
pub fn default_registry() -> Registry {
    Registry::new()
        .with(FileKind::Dat, Arc::new(DatParser))
        .with(FileKind::Pkz, Arc::new(PkzParser::default()))
        .with(FileKind::Cpk, Arc::new(CpkParser::default()))
}

#[cfg(test)]
mod test {
    use plat_core::{FileKind, TypeResolver};

    use super::default_registry;

    #[test]
    fn containers_are_registered() {
        let registry = default_registry();

        assert!(registry.is_registered(FileKind::Dat));
        assert!(registry.is_registered(FileKind::Pkz));
        assert!(registry.is_registered(FileKind::Cpk));
        assert!(!registry.is_registered(FileKind::Xml));
        assert!(!registry.is_registered(FileKind::SaveGame));
    }

    #[test]
    fn plain_files_pass_through() -> plat_core::error::Result<()> {
        let registry = default_registry();
        let parser = registry.resolve("ui_title.bxm");
        assert!(parser
            .extract(b"XML\0".to_vec().into(), "ui_title.bxm", &registry)?
            .is_none());
        Ok(())
    }
}
