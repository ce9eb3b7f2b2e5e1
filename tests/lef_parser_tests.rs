//! End-to-end LEF parsing over realistic library snippets.

use lefdef_core::lef::parser::parse_lef;
use lefdef_core::NameInterner;

#[test]
fn test_basic_macro_parsing() {
    let lef_content = r#"
VERSION 5.8 ;
NAMESCASESENSITIVE ON ;

LAYER M1
   TYPE ROUTING ;
   DIRECTION HORIZONTAL ;
   PITCH 0.2 ;
END M1

MACRO INVERTER
   CLASS CORE ;
   ORIGIN 0 0 ;
   SIZE 1.0 BY 1.2 ;
   SITE core ;

   PIN A
      DIRECTION INPUT ;
      USE SIGNAL ;
      PORT
         LAYER M1 ;
         RECT 0.1 0.4 0.3 0.6 ;
      END
   END A

   PIN Y
      DIRECTION OUTPUT ;
      USE SIGNAL ;
      PORT
         LAYER M1 ;
         RECT 1.1 0.4 1.3 0.6 ;
      END
   END Y

   OBS
      LAYER M1 ;
      RECT 0.5 0.0 0.7 1.2 ;
   END
END INVERTER
"#;

    let names = NameInterner::new();
    let lef = parse_lef(lef_content, &names);

    assert!(lef.layers.contains_key("M1"));
    assert_eq!(lef.macros.len(), 1);

    let inv = &lef.macros[&names.get("INVERTER").unwrap()];
    assert_eq!(inv.class.as_deref(), Some("CORE"));
    assert_eq!(inv.size, Some((1.0, 1.2)));
    assert_eq!(inv.site.as_deref(), Some("core"));
    assert_eq!(inv.pins.len(), 2);

    let pin_a = &inv.pins[&names.get("A").unwrap()];
    assert_eq!(pin_a.direction.as_deref(), Some("INPUT"));
    assert_eq!(pin_a.use_type.as_deref(), Some("SIGNAL"));
    assert_eq!(pin_a.ports.len(), 1);
    let rects = &pin_a.ports[0].shapes["M1"];
    assert_eq!(rects.len(), 1);
    assert_eq!((rects[0].xl, rects[0].yh), (0.1, 0.6));

    assert_eq!(inv.obs["M1"].len(), 1);
}

#[test]
fn test_end_name_matching_with_tricky_content() {
    // The pin named B contains a property value mentioning "END B";
    // name-matched END handling must not terminate early on it.
    let lef_content = r#"
MACRO RAM
   SIZE 50.0 BY 60.0 ;
   PIN B
      DIRECTION INPUT ;
      PROPERTY note "see END B for details" ;
   END B
   PIN C
      DIRECTION OUTPUT ;
   END C
END RAM
"#;

    let names = NameInterner::new();
    let lef = parse_lef(lef_content, &names);
    let ram = &lef.macros[&names.get("RAM").unwrap()];
    assert_eq!(ram.pins.len(), 2);
    assert!(ram.pins.contains_key(&names.get("C").unwrap()));
}

#[test]
fn test_antenna_lines() {
    let lef_content = r#"
MACRO BUF
   SIZE 2.0 BY 1.0 ;
   PIN A
      DIRECTION INPUT ;
      ANTENNAGATEAREA 0.3 LAYER M1 ;
      ANTENNADIFFAREA 0.25 ;
      ANTENNABOGUS broken ;
   END A
END BUF
"#;

    let names = NameInterner::new();
    let lef = parse_lef(lef_content, &names);
    let buf = &lef.macros[&names.get("BUF").unwrap()];
    let pin = &buf.pins[&names.get("A").unwrap()];
    // The non-numeric antenna line is dropped.
    assert_eq!(pin.antennas.len(), 2);
    assert_eq!(pin.antennas[0].kind, "ANTENNAGATEAREA");
    assert_eq!(pin.antennas[0].value, 0.3);
    assert_eq!(pin.antennas[0].layer, "M1");
    assert_eq!(pin.antennas[1].layer, "");
}

#[test]
fn test_multiple_ports_and_sensitivities() {
    let lef_content = r#"
MACRO PAD
   SIZE 60.0 BY 80.0 ;
   PIN VDDIO
      DIRECTION INOUT ;
      USE POWER ;
      SUPPLYSENSITIVITY VDD ;
      GROUNDSENSITIVITY VSS ;
      PORT
         LAYER M3 ;
         RECT 0.0 0.0 5.0 5.0 ;
         RECT 10.0 0.0 15.0 5.0 ;
      END
      PORT
         LAYER M4 ;
         RECT 0.0 10.0 5.0 15.0 ;
      END
   END VDDIO
END PAD
"#;

    let names = NameInterner::new();
    let lef = parse_lef(lef_content, &names);
    let pad = &lef.macros[&names.get("PAD").unwrap()];
    let pin = &pad.pins[&names.get("VDDIO").unwrap()];
    assert_eq!(pin.supply_sensitivity.as_deref(), Some("VDD"));
    assert_eq!(pin.ground_sensitivity.as_deref(), Some("VSS"));
    assert_eq!(pin.ports.len(), 2);
    assert_eq!(pin.ports[0].shapes["M3"].len(), 2);
    assert_eq!(pin.ports[1].shapes["M4"].len(), 1);
}

#[test]
fn test_unterminated_block_does_not_swallow_following_macros() {
    let lef_content = r#"
SITE broken_site
   CLASS CORE ;
MACRO GOOD
   SIZE 1.0 BY 1.0 ;
END GOOD
"#;

    let names = NameInterner::new();
    let lef = parse_lef(lef_content, &names);
    // broken_site never sees its END, so only its header is skipped
    // and GOOD still parses.
    assert!(lef.sites.is_empty());
    assert!(lef.macros.contains_key(&names.get("GOOD").unwrap()));
}

#[test]
fn test_via_and_property_definitions() {
    let lef_content = r#"
PROPERTYDEFINITIONS
   MACRO maskLayoutSubType STRING ;
   PIN realPower REAL ;
END PROPERTYDEFINITIONS

VIA via12_stack DEFAULT
   LAYER M1 ;
   RECT -0.07 -0.07 0.07 0.07 ;
   LAYER V1 ;
   RECT -0.035 -0.035 0.035 0.035 ;
END via12_stack
"#;

    let names = NameInterner::new();
    let lef = parse_lef(lef_content, &names);

    assert_eq!(
        lef.property_definitions
            .get("MACRO maskLayoutSubType")
            .map(String::as_str),
        Some("STRING")
    );
    let via = &lef.vias["via12_stack"];
    assert_eq!(via.shapes["M1"].len(), 1);
    assert_eq!(via.shapes["V1"].len(), 1);
    assert!(via.source.contains("RECT -0.07"));
}

#[test]
fn test_foreign_and_symmetry() {
    let lef_content = r#"
MACRO DFF
   CLASS CORE ;
   FOREIGN DFF 0.0 0.0 ;
   SYMMETRY X Y ;
   SIZE 4.6 BY 2.4 ;
END DFF
"#;

    let names = NameInterner::new();
    let lef = parse_lef(lef_content, &names);
    let dff = &lef.macros[&names.get("DFF").unwrap()];
    assert_eq!(dff.foreign.as_ref().unwrap().cell, "DFF");
    assert_eq!(dff.symmetry, vec!["X", "Y"]);
}

#[test]
fn test_comments_ignored() {
    let lef_content = "# library header\nMACRO A1 # trailing comment\n   SIZE 1.0 BY 1.0 ; # size note\nEND A1\n";
    let names = NameInterner::new();
    let lef = parse_lef(lef_content, &names);
    let a1 = &lef.macros[&names.get("A1").unwrap()];
    assert_eq!(a1.size, Some((1.0, 1.0)));
}
