//! Demo programs bundled into the binary.

/// What a demo is expected to do when run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Accepted,
    Rejected,
}

pub struct Demo {
    pub file: &'static str,
    pub source: &'static str,
    pub expect: Expect,
}

pub const DEMOS: &[Demo] = &[
    Demo {
        file: "overwrite.toml",
        source: include_str!("../../demos/overwrite.toml"),
        expect: Expect::Accepted,
    },
    Demo {
        file: "round_trip.toml",
        source: include_str!("../../demos/round_trip.toml"),
        expect: Expect::Accepted,
    },
    Demo {
        file: "counter.toml",
        source: include_str!("../../demos/counter.toml"),
        expect: Expect::Accepted,
    },
    Demo {
        file: "three_cells.toml",
        source: include_str!("../../demos/three_cells.toml"),
        expect: Expect::Accepted,
    },
    Demo {
        file: "escape.toml",
        source: include_str!("../../demos/escape.toml"),
        expect: Expect::Rejected,
    },
    Demo {
        file: "foreign_handle.toml",
        source: include_str!("../../demos/foreign_handle.toml"),
        expect: Expect::Rejected,
    },
];
