// src/preset.rs
//
// minimap2 alignment presets accepted on the command line

use std::fmt;

use clap::ValueEnum;

/// Parameter bundle passed to `minimap2 -x`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Oxford Nanopore genomic reads
    #[default]
    #[value(name = "map-ont")]
    MapOnt,
    /// PacBio CLR genomic reads
    #[value(name = "map-pb")]
    MapPb,
    /// PacBio HiFi/CCS genomic reads
    #[value(name = "map-hifi")]
    MapHifi,
    /// Illumina Complete Long Reads
    #[value(name = "map-iclr")]
    MapIclr,
    /// Accurate long reads (error rate <1%)
    #[value(name = "lr:hq")]
    LrHq,
    /// Nanopore read overlap
    #[value(name = "ava-ont")]
    AvaOnt,
    /// PacBio read overlap
    #[value(name = "ava-pb")]
    AvaPb,
    /// Assembly to reference, ~0.1% divergence
    #[value(name = "asm5")]
    Asm5,
    /// Assembly to reference, ~1% divergence
    #[value(name = "asm10")]
    Asm10,
    /// Assembly to reference, ~5% divergence
    #[value(name = "asm20")]
    Asm20,
    /// Long-read spliced alignment
    #[value(name = "splice")]
    Splice,
    /// Long-read spliced alignment for high-quality reads
    #[value(name = "splice:hq")]
    SpliceHq,
    /// Short genomic paired-end reads
    #[value(name = "sr")]
    Sr,
}

impl Preset {
    /// Name as minimap2 expects it after `-x`
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::MapOnt => "map-ont",
            Preset::MapPb => "map-pb",
            Preset::MapHifi => "map-hifi",
            Preset::MapIclr => "map-iclr",
            Preset::LrHq => "lr:hq",
            Preset::AvaOnt => "ava-ont",
            Preset::AvaPb => "ava-pb",
            Preset::Asm5 => "asm5",
            Preset::Asm10 => "asm10",
            Preset::Asm20 => "asm20",
            Preset::Splice => "splice",
            Preset::SpliceHq => "splice:hq",
            Preset::Sr => "sr",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
