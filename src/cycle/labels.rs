use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// Parse an element name, ignoring case ("wood", "Wood", "WOOD").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match Self::ALL.iter().find(|e| e.name().eq_ignore_ascii_case(s)) {
            Some(element) => Ok(*element),
            None => bail!("unknown element '{}'", s),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which label representation rule targets and chart input are written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelField {
    /// Pinyin romanization, e.g. "jia", "zi"
    #[default]
    English,
    /// Hanzi, e.g. "甲", "子"
    Chinese,
}

/// The ten heavenly stems, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    pub fn english(self) -> &'static str {
        match self {
            Stem::Jia => "jia",
            Stem::Yi => "yi",
            Stem::Bing => "bing",
            Stem::Ding => "ding",
            Stem::Wu => "wu",
            Stem::Ji => "ji",
            Stem::Geng => "geng",
            Stem::Xin => "xin",
            Stem::Ren => "ren",
            Stem::Gui => "gui",
        }
    }

    pub fn chinese(self) -> &'static str {
        match self {
            Stem::Jia => "甲",
            Stem::Yi => "乙",
            Stem::Bing => "丙",
            Stem::Ding => "丁",
            Stem::Wu => "戊",
            Stem::Ji => "己",
            Stem::Geng => "庚",
            Stem::Xin => "辛",
            Stem::Ren => "壬",
            Stem::Gui => "癸",
        }
    }

    pub fn label(self, field: LabelField) -> &'static str {
        match field {
            LabelField::English => self.english(),
            LabelField::Chinese => self.chinese(),
        }
    }

    /// Exact label lookup in the given representation.
    pub fn from_label(field: LabelField, label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.label(field) == label)
    }
}

/// The twelve earthly branches, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    pub fn english(self) -> &'static str {
        match self {
            Branch::Zi => "zi",
            Branch::Chou => "chou",
            Branch::Yin => "yin",
            Branch::Mao => "mao",
            Branch::Chen => "chen",
            Branch::Si => "si",
            Branch::Wu => "wu",
            Branch::Wei => "wei",
            Branch::Shen => "shen",
            Branch::You => "you",
            Branch::Xu => "xu",
            Branch::Hai => "hai",
        }
    }

    pub fn chinese(self) -> &'static str {
        match self {
            Branch::Zi => "子",
            Branch::Chou => "丑",
            Branch::Yin => "寅",
            Branch::Mao => "卯",
            Branch::Chen => "辰",
            Branch::Si => "巳",
            Branch::Wu => "午",
            Branch::Wei => "未",
            Branch::Shen => "申",
            Branch::You => "酉",
            Branch::Xu => "戌",
            Branch::Hai => "亥",
        }
    }

    pub fn label(self, field: LabelField) -> &'static str {
        match field {
            LabelField::English => self.english(),
            LabelField::Chinese => self.chinese(),
        }
    }

    pub fn from_label(field: LabelField, label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.label(field) == label)
    }

    /// Element tags carried by this branch. The first entry is the principal element.
    pub fn elements(self) -> &'static [Element] {
        use Element::*;
        match self {
            Branch::Zi => &[Water],
            Branch::Chou => &[Earth, Water, Metal],
            Branch::Yin => &[Wood, Fire, Earth],
            Branch::Mao => &[Wood],
            Branch::Chen => &[Earth, Wood, Water],
            Branch::Si => &[Fire, Earth, Metal],
            Branch::Wu => &[Fire, Earth],
            Branch::Wei => &[Earth, Fire, Wood],
            Branch::Shen => &[Metal, Water, Earth],
            Branch::You => &[Metal],
            Branch::Xu => &[Earth, Metal, Fire],
            Branch::Hai => &[Water, Wood],
        }
    }
}
