//! End-to-end: build a zone, pack it as a FastFile, decode it back.

use fastzone::prelude::*;
use fastzone::Options;

struct ZoneBuilder {
    buf: Vec<u8>,
    endian: Endian,
}

impl ZoneBuilder {
    fn new(def: &GameDefinition, script_strings: &[&str], types: &[u8]) -> Self {
        let mut b = Self {
            buf: Vec::new(),
            endian: def.endian,
        };
        b.u32(0).u32(0);
        for _ in 0..def.zone.block_slots {
            b.u32(0);
        }
        b.u32(script_strings.len() as u32).ff();
        b.u32(types.len() as u32).ff();
        for _ in script_strings {
            b.ff();
        }
        for s in script_strings {
            b.cstr(s);
        }
        for &t in types {
            b.u32(t as u32).ff();
        }
        b
    }

    fn ff(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0xFF; 4]);
        self
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.endian.put_u32(&mut self.buf, v);
        self
    }

    fn cstr(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        self
    }

    fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    fn rawfile(&mut self, name: &str, body: &[u8]) -> &mut Self {
        self.ff().u32(body.len() as u32).ff().cstr(name).raw(body).raw(&[0])
    }
}

fn code(def: &GameDefinition, t: AssetType) -> u8 {
    def.code_for(t).unwrap()
}

fn pack(def: &GameDefinition, zone: &[u8]) -> Vec<u8> {
    fastzone::ff::repack(zone, def.game, def.platform).unwrap()
}

#[test]
fn test_sequential_zone_round_trip() {
    let def = GameDefinition::lookup(Game::CoD4, Platform::Ps3).unwrap();
    let mut zone = ZoneBuilder::new(
        def,
        &["tag_origin"],
        &[
            code(def, AssetType::RawFile),
            code(def, AssetType::Localize),
            code(def, AssetType::StringTable),
        ],
    );
    let script = b"main()\n{\n\tlevel.x = 1;\n}\n";
    zone.rawfile("maps/mp/gametypes/dm.gsc", script);
    zone.ff().ff().cstr("Free-for-all").cstr("MPUI_DEATHMATCH");
    zone.ff().u32(2).u32(2).ff().cstr("mp/modes.csv");
    zone.cstr("dm").cstr("1").cstr("war").cstr("2");

    let decoded = fastzone::decode_bytes(pack(def, &zone.buf), &Options::default()).unwrap();

    assert_eq!(decoded.header.game, Game::CoD4);
    assert_eq!(decoded.header.platform, Platform::Ps3);
    assert_eq!(decoded.report.strategy, Strategy::StandardBlocks);
    assert_eq!(decoded.zone.data(), zone.buf.as_slice());
    assert_eq!(decoded.zone.script_strings().get(0), Some("tag_origin"));

    let walk = &decoded.walk;
    assert_eq!(walk.count(RecordState::Decoded), 3);
    assert!(walk.switched_at.is_none());

    let Some(Asset::RawFile(raw)) = walk.asset_for(&walk.records[0]) else {
        panic!("expected a rawfile");
    };
    assert_eq!(raw.contents(decoded.zone.data()), Some(&script[..]));

    let Some(Asset::StringTable(table)) = walk.asset_for(&walk.records[2]) else {
        panic!("expected a string table");
    };
    assert_eq!(table.to_csv(), "dm,1\nwar,2\n");
}

#[test]
fn test_unsupported_entry_recovers_rest() {
    let def = GameDefinition::lookup(Game::WaW, Platform::Ps3).unwrap();
    let mut zone = ZoneBuilder::new(
        def,
        &[],
        &[
            code(def, AssetType::RawFile),
            code(def, AssetType::Sound),
            code(def, AssetType::RawFile),
            code(def, AssetType::Localize),
        ],
    );
    zone.rawfile("mp/first.cfg", b"seta a 1");
    zone.raw(&[0x5A; 300]);
    zone.rawfile("mp/second.cfg", b"seta b 2");
    zone.ff().ff().cstr("Second").cstr("MENU_SECOND");

    let decoded = fastzone::decode_bytes(pack(def, &zone.buf), &Options::default()).unwrap();
    let walk = &decoded.walk;

    assert_eq!(walk.switched_at, Some(1));
    let states: Vec<_> = walk.records.iter().map(|r| r.state).collect();
    assert_eq!(
        states,
        [
            RecordState::Decoded,
            RecordState::Unsupported,
            RecordState::Decoded,
            RecordState::Decoded
        ]
    );
    assert_eq!(walk.records[1].type_name, "sound");
    assert_eq!(walk.records[2].name.as_deref(), Some("mp/second.cfg"));
    assert!(walk.records[2].recovered);
    assert_eq!(walk.records[3].name.as_deref(), Some("MENU_SECOND"));
}

#[test]
fn test_larger_zone_spans_blocks() {
    let def = GameDefinition::lookup(Game::MW2, Platform::Ps3).unwrap();
    let mut zone = ZoneBuilder::new(def, &[], &[code(def, AssetType::RawFile)]);
    let body: Vec<u8> = (0..200_000u32).map(|i| b"abcdefgh\n"[(i % 9) as usize]).collect();
    zone.ff().u32(0).u32(body.len() as u32).ff().cstr("maps/big.txt").raw(&body);

    let decoded = fastzone::decode_bytes(pack(def, &zone.buf), &Options::default()).unwrap();
    assert!(decoded.report.blocks_ok >= 4);
    assert_eq!(decoded.zone.data().len(), zone.buf.len());

    let Some(Asset::RawFile(raw)) = decoded.walk.assets.first() else {
        panic!("expected a rawfile");
    };
    assert_eq!(raw.name, "maps/big.txt");
    assert_eq!(raw.data_len(), body.len());
    assert!(!raw.truncated);
}

#[test]
fn test_wii_is_detected_but_not_decoded() {
    let packed = fastzone::ff::repack(&[0u8; 64], Game::CoD4, Platform::Wii).unwrap();
    let ff = FastFile::from_bytes(packed.clone()).unwrap();
    assert!(ff.header().is_wii());
    assert!(ff.decompress().is_ok());
    assert!(matches!(
        fastzone::decode_bytes(packed, &Options::default()),
        Err(fastzone::Error::Zone(_))
    ));
}
