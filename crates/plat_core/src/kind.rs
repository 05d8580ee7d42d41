//! Classification of archive members by file name.

use std::fmt;

/// The kind of content a file holds, derived from its name.
///
/// Archives use this to decide which [`crate::resolve::FileParser`] should look at a member.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKind {
    /// Binary XML and the formats sharing its layout
    Xml,
    /// Plain CSV text
    Csv,
    /// Game text data
    LocalizationBin,
    /// Font glyph mapping and strings
    LocalizationMcd,
    /// Flat DAT archive (also `.dtt`, `.evn`, `.eff`)
    Dat,
    /// Compressed PKZ archive
    Pkz,
    /// CRI CPK archive
    Cpk,
    /// Texture headers
    TextureWta,
    /// Texture data
    TextureWtp,
    /// Texture headers and data combined
    TextureWtb,
    /// Model data
    Model,
    /// Model collision data
    Collision,
    /// Animation data
    Animation,
    /// Raw Wwise audio
    AudioWem,
    /// Wwise sound bank
    AudioBnk,
    /// Wwise info
    AudioWwi,
    /// Wwise audio info
    AudioWai,
    /// Ruby script config
    Ruby,
    /// UI data
    UiUid,
    /// UI companion data
    UiUvd,
    /// Astral Chain save slot
    SaveSlot,
    /// Astral Chain global save
    SaveGame,
    /// Anything not recognised
    Unknown,
}

impl FileKind {
    /// Classify a file by its name. Only the last path component is considered.
    pub fn from_name(name: &str) -> Self {
        let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

        if base == "GameData.dat" {
            return FileKind::SaveGame;
        }
        if base
            .strip_prefix("SlotData_")
            .and_then(|rest| rest.strip_suffix(".dat"))
            .is_some_and(|slot| slot.chars().count() == 1)
        {
            return FileKind::SaveSlot;
        }

        let Some((_, extension)) = base.rsplit_once('.') else {
            return FileKind::Unknown;
        };

        match extension.to_ascii_lowercase().as_str() {
            "bxm" | "seq" | "lay" | "sar" | "gad" | "ccd" | "rld" | "csa" | "vcd" => FileKind::Xml,
            "csv" => FileKind::Csv,
            "bin" => FileKind::LocalizationBin,
            "mcd" => FileKind::LocalizationMcd,
            "dat" | "dtt" | "evn" | "eff" => FileKind::Dat,
            "pkz" => FileKind::Pkz,
            "cpk" => FileKind::Cpk,
            "wta" => FileKind::TextureWta,
            "wtp" => FileKind::TextureWtp,
            "wtb" => FileKind::TextureWtb,
            "wmb" => FileKind::Model,
            "col" => FileKind::Collision,
            "mot" => FileKind::Animation,
            "wem" => FileKind::AudioWem,
            "bnk" => FileKind::AudioBnk,
            "wwi" => FileKind::AudioWwi,
            "wai" => FileKind::AudioWai,
            "rbd" => FileKind::Ruby,
            "uid" => FileKind::UiUid,
            "uvd" => FileKind::UiUvd,
            _ => FileKind::Unknown,
        }
    }

    /// Whether files of this kind are containers holding further files
    pub fn is_folder(&self) -> bool {
        matches!(self, FileKind::Dat | FileKind::Pkz | FileKind::Cpk)
    }

    /// The `type/subtype` label used when listing files
    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Xml => "text/xml",
            FileKind::Csv => "text/csv",
            FileKind::LocalizationBin => "localization/bin",
            FileKind::LocalizationMcd => "localization/mcd",
            FileKind::Dat => "folder/dat",
            FileKind::Pkz => "folder/pkz",
            FileKind::Cpk => "folder/cpk",
            FileKind::TextureWta => "texture/wta",
            FileKind::TextureWtp => "texture/wtp",
            FileKind::TextureWtb => "texture/wtb",
            FileKind::Model => "model/wmb",
            FileKind::Collision => "model/col",
            FileKind::Animation => "animation/mot",
            FileKind::AudioWem => "audio/wem",
            FileKind::AudioBnk => "audio/bnk",
            FileKind::AudioWwi => "audio/wwi",
            FileKind::AudioWai => "audio/wai",
            FileKind::Ruby => "ruby/rbd",
            FileKind::UiUid => "ui/uid",
            FileKind::UiUvd => "ui/uvd",
            FileKind::SaveSlot => "save/astralchain_slot",
            FileKind::SaveGame => "save/astralchain_game",
            FileKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
