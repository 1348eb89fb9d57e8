/// The name of control change `controller`, for the controllers that have a
/// common one.
pub fn controller_name(controller: u8) -> Option<&'static str> {
    let name = match controller {
        0 => "Bank Select",
        1 => "Modulation",
        2 => "Breath",
        4 => "Foot Control",
        5 => "Portamento Time",
        6 => "Data Entry",
        7 => "Volume",
        8 => "Balance",
        10 => "Pan",
        11 => "Expression",
        12 => "Effect 1",
        13 => "Effect 2",
        16..=19 => ["General 1", "General 2", "General 3", "General 4"][(controller - 16) as usize],
        32..=63 => "LSB",
        64 => "Sustain Pedal",
        65 => "Portamento",
        66 => "Sostenuto",
        67 => "Soft Pedal",
        68 => "Legato Pedal",
        69 => "Hold 2",
        70 => "Sound Variation",
        71 => "Resonance",
        72 => "Release Time",
        73 => "Attack Time",
        74 => "Brightness",
        75..=79 => ["Sound 6", "Sound 7", "Sound 8", "Sound 9", "Sound 10"][(controller - 75) as usize],
        80..=83 => ["General 5", "General 6", "General 7", "General 8"][(controller - 80) as usize],
        84 => "Portamento Control",
        88 => "Velocity Prefix",
        91 => "Reverb",
        92 => "Tremolo",
        93 => "Chorus",
        94 => "Celeste Depth",
        95 => "Phaser Depth",
        96 => "Data Increment",
        97 => "Data Decrement",
        98 => "NRPN LSB",
        99 => "NRPN MSB",
        100 => "RPN LSB",
        101 => "RPN MSB",
        120 => "Sound Off",
        121 => "Reset",
        122 => "Local",
        123 => "Notes Off",
        124 => "Omni Off",
        125 => "Omni On",
        126 => "Mono",
        127 => "Poly",
        _ => return None,
    };
    Some(name)
}

#[test]
fn names_common_controllers() {
    use pretty_assertions::assert_eq;
    assert_eq!(controller_name(7), Some("Volume"));
    assert_eq!(controller_name(18), Some("General 3"));
    assert_eq!(controller_name(77), Some("Sound 8"));
    assert_eq!(controller_name(83), Some("General 8"));
    assert_eq!(controller_name(123), Some("Notes Off"));
    assert_eq!(controller_name(3), None);
    assert_eq!(controller_name(128), None);
}
