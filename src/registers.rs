use crate::codec::{ByteLabels, Encoding, Flag, Half, Value};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct Mode(u8);

impl serde::Serialize for Mode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.0 & Self::R.0 == 0 { "-" } else { "R" })?;
        f.write_str(if self.0 & Self::W.0 == 0 { "-" } else { "W" })?;
        Ok(())
    }
}

impl Mode {
    pub const R: Self = Self(1 << 0);
    pub const W: Self = Self(1 << 1);
    pub const RW: Self = Self(Self::R.0 | Self::W.0);
    const R_: Self = Self::R;

    pub const fn is_writable(&self) -> bool {
        self.0 & Self::W.0 != 0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RegisterIndex(usize);

impl RegisterIndex {
    pub const fn from_address(address: u16) -> Option<RegisterIndex> {
        let (mut low, mut high) = (0, ADDRESSES.len());
        while low < high {
            let mid = low + (high - low) / 2;
            if ADDRESSES[mid] < address {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        if low < ADDRESSES.len() && ADDRESSES[low] == address { Some(Self(low)) } else { None }
    }

    pub fn all() -> impl Iterator<Item = RegisterIndex> {
        (0..ADDRESSES.len()).map(Self)
    }

    pub const fn address(&self) -> u16 {
        ADDRESSES[self.0]
    }

    pub fn name(&self) -> &'static str {
        NAMES[self.0]
    }

    pub fn summary(&self) -> &'static str {
        SUMMARIES[self.0]
    }

    pub fn description(&self) -> &'static str {
        DESCRIPTIONS[self.0]
    }

    pub const fn encoding(&self) -> Encoding {
        ENCODINGS[self.0]
    }

    pub fn mode(&self) -> Mode {
        MODES[self.0]
    }

    /// The raw word this register reports when the sensor or feature is absent.
    pub fn sentinel(&self) -> Option<u16> {
        SENTINELS[self.0]
    }

    pub fn is_writable(&self) -> bool {
        self.mode().is_writable()
    }

    pub fn is_packed(&self) -> bool {
        self.encoding().is_packed()
    }

    pub fn decode(&self, raw: u16) -> Value {
        if self.sentinel() == Some(raw) {
            return Value::Unavailable(raw);
        }
        self.encoding().decode(raw)
    }
}

/// Catalog entry for `address`, `None` for undocumented and reserved addresses.
pub fn lookup(address: u16) -> Option<RegisterIndex> {
    RegisterIndex::from_address(address)
}

pub fn is_writable(address: u16) -> bool {
    lookup(address).is_some_and(|r| r.is_writable())
}

/// A 32-bit energy counter split over two adjacent registers.
#[derive(Clone, Copy, Debug)]
pub struct EnergyPair {
    pub high: u16,
    pub low: u16,
    pub name: &'static str,
}

pub static ENERGY_TOTALS: [EnergyPair; 8] = [
    EnergyPair { high: 143, low: 144, name: "Energy consumption" },
    EnergyPair { high: 145, low: 146, name: "Power output" },
    EnergyPair { high: 152, low: 153, name: "Cum system heating" },
    EnergyPair { high: 154, low: 155, name: "Cum renewable heating" },
    EnergyPair { high: 156, low: 157, name: "Cum system power" },
    EnergyPair { high: 158, low: 159, name: "Cum heating energy" },
    EnergyPair { high: 160, low: 161, name: "Cum renewable energy" },
    EnergyPair { high: 162, low: 163, name: "Cum heating power" },
];

const _ASSERT_ENERGY_PAIRS_ARE_TAGGED: () = const {
    let mut idx = 0;
    while idx < ENERGY_TOTALS.len() {
        let pair = ENERGY_TOTALS[idx];
        assert!(pair.low == pair.high + 1, "energy pair halves must be adjacent");
        let (Some(high), Some(low)) =
            (RegisterIndex::from_address(pair.high), RegisterIndex::from_address(pair.low))
        else {
            panic!("energy pair registers must be in the catalog");
        };
        assert!(matches!(high.encoding(), Encoding::Combined32(Half::High)));
        assert!(matches!(low.encoding(), Encoding::Combined32(Half::Low)));
        idx += 1;
    }
};

// Short aliases for the tabulated `for_each_register` definition below.
const U16: Encoding = Encoding::U16;
const CEL: Encoding = Encoding::Signed { unit: "°C" };
const DEG: Encoding = Encoding::Plain { unit: "°C" };
const MIN: Encoding = Encoding::Plain { unit: "min" };
const KW: Encoding = Encoding::Scale { divisor: 100, unit: "kW" };
const KWH: Encoding = Encoding::Scale { divisor: 100, unit: "kWh" };
const COP: Encoding = Encoding::Scale { divisor: 100, unit: "" };
const HI: Encoding = Encoding::Combined32(Half::High);
const LO: Encoding = Encoding::Combined32(Half::Low);
const ZONES: Encoding = Encoding::ZonePair(ByteLabels::ZONES);
const ON_OFF: Encoding = Encoding::Enumerated(&[(0, "Off"), (1, "On")]);
const FORCED: Encoding = Encoding::Enumerated(&[(0, "Normal"), (1, "Force on"), (2, "Force off")]);
const RESERVED: Encoding = Encoding::U16;
const UNDOCUMENTED_BITS: Encoding = Encoding::BitField(&[]);

const fn plain(unit: &'static str) -> Encoding {
    Encoding::Plain { unit }
}
const fn scale(divisor: u16, unit: &'static str) -> Encoding {
    Encoding::Scale { divisor, unit }
}
const fn multiple(factor: u16, unit: &'static str) -> Encoding {
    Encoding::Multiple { factor, unit }
}
const fn pair(low: &'static str, high: &'static str) -> Encoding {
    Encoding::ZonePair(ByteLabels { low, high })
}
const fn bits(flags: &'static [Flag]) -> Encoding {
    Encoding::BitField(flags)
}
const fn enumerated(labels: &'static [(u16, &'static str)]) -> Encoding {
    Encoding::Enumerated(labels)
}

macro_rules! flags {
    ($($bit: literal => $name: literal),* $(,)?) => {
        &[$(Flag { bit: $bit, name: $name }),*]
    };
}

const POWER_FLAGS: &[Flag] = flags![
    0 => "Zone1/2 room temp control",
    1 => "Zone1 water temp control",
    2 => "DHW power",
    3 => "Zone2 water temp control",
];
const FUNCTION_FLAGS: &[Flag] = flags![
    0 => "Refrigerant leak detection",
    4 => "Disinfection timer",
    5 => "Holiday away",
    6 => "Silent mode",
    7 => "Silent level 2",
    8 => "Holiday home",
    10 => "ECO mode",
    11 => "DHW circulation pump",
    12 => "Climate curve Zone1",
    13 => "Climate curve Zone2",
    14 => "C2 fault restore",
];
const SPECIAL_FUNCTION_FLAGS: &[Flag] = flags![
    1 => "SG1 signal",
    2 => "SG2/EVU signal",
];
const FUNCTION_INQUIRY_FLAGS: &[Flag] = flags![
    4 => "Disinfection running",
];
const STATUS_1_FLAGS: &[Flag] = flags![
    1 => "Defrosting",
    2 => "Anti-freeze",
    3 => "Oil return",
    4 => "Remote on/off",
    6 => "HT room thermostat",
    7 => "CL room thermostat",
    8 => "Solar thermal signal",
    9 => "DHW anti-freeze",
    10 => "SG",
    11 => "EVU",
];
const LOAD_OUTPUT_FLAGS: &[Flag] = flags![
    0 => "IBH1",
    1 => "IBH2",
    2 => "TBH",
    3 => "Pump_i",
    4 => "SV1",
    5 => "SV2",
    6 => "Pump_o",
    7 => "Pump_d",
    8 => "Pump_c",
    9 => "SV3",
    10 => "Crankcase heater",
    11 => "Pump_s",
    12 => "Alarm",
    14 => "AHS",
];
const STATUS_2_FLAGS: &[Flag] = flags![
    7 => "Three-phase supply",
    8 => "0.1 °C resolution",
];
const STATUS_3_FLAGS: &[Flag] = flags![
    3 => "Cooling",
    4 => "Heating",
    5 => "DHW",
    8 => "Energy metering",
    9 => "T1 sensor",
    10 => "IBH enabled",
    11 => "AHS heat+DHW",
    14 => "AHS enabled",
    15 => "TBH enabled",
];
const PARAMETER_1_FLAGS: &[Flag] = flags![
    0 => "DHW priority",
    1 => "Room thermostat dual zone",
    2 => "RT mode set",
    3 => "RT function",
    4 => "Room temp function",
    5 => "Pump_i silent",
    7 => "Heating",
    9 => "Cooling",
    10 => "Pump_d disinfection",
    11 => "DHW priority function",
    12 => "Pump_d function",
    13 => "Disinfection function",
    15 => "DHW function",
];
const PARAMETER_2_FLAGS: &[Flag] = flags![
    1 => "Tbt function",
    3 => "Double zone",
    7 => "Smart grid",
    8 => "M1M2 drives TBH",
    9 => "Solar kit",
    10 => "Solar control",
    11 => "Pipe length >= 10m",
    12 => "Tbt1 function",
    13 => "T1T2 setting",
    14 => "M1M2 AHS",
    15 => "ACS status",
];

const MODE_SETTING: &[(u16, &str)] = &[(1, "Auto"), (2, "Cooling"), (3, "Heating")];
const SILENT_LEVEL: &[(u16, &str)] = &[(0, "Level 1"), (1, "Level 2"), (2, "Boost")];
const OPERATING_MODE: &[(u16, &str)] = &[(0, "Off"), (2, "Cooling"), (3, "Heating")];
const HEAT_PUMP_MODE: &[(u16, &str)] = &[(0, "Off"), (2, "Cooling"), (3, "Heating"), (5, "DHW")];
const ERROR_CODES: &[(u16, &str)] = &[
    (0, "No error"),
    (1, "E0 water flow"),
    (2, "E1 phase"),
    (3, "E2 communication"),
    (9, "E8 flow fault"),
    (20, "P0 low pressure"),
    (21, "P1 high pressure"),
    (24, "P4 high discharge temp"),
];
const SUB_MODELS: &[(u16, &str)] = &[
    (0, "R32-P"),
    (1, "Aqua"),
    (2, "C-R32-P"),
    (3, "R290-A"),
    (4, "R290-N"),
    (5, "C-R290-A"),
    (6, "C-R290-N"),
    (7, "R32-A"),
    (8, "C-R32-A"),
    (9, "R290-M"),
    (10, "R32-H"),
];
const NO_ERROR: &[(u16, &str)] = &[(0, "No error")];
const ENABLED: &[(u16, &str)] = &[(0, "Disabled"), (1, "Enabled")];

// Undocumented addresses (23..=99, 200, 214, ...) are absent and reported as unknown.
macro_rules! for_each_register {
    ($m:ident) => {
        $m! {
            0: bits(POWER_FLAGS), RW, "Power on/off", "Bit field";
            1: enumerated(MODE_SETTING), RW, "Mode setting", "1=Auto, 2=Cooling, 3=Heating";
            2: ZONES, RW, "Set water temp T1s", "Zone1 (low 8), Zone2 (high 8)";
            3: DEG, RW, "Set air temp Tas", "Room temp control";
            4: DEG, RW, "Set DHW temp T5s", "DHW tank temp";
            5: bits(FUNCTION_FLAGS), RW, "Function setting", "Bit field";
            6: ZONES, RW, "Temp curve selection", "Zone1 (low 8), Zone2 (high 8)";
            7: FORCED, RW, "Forced DHW", "0=Normal, 1=Force on, 2=Force off";
            8: FORCED, RW, "Forced TBH", "0=Normal, 1=Force on, 2=Force off";
            9: FORCED, RW, "Forced IBH", "0=Normal, 1=Force on, 2=Force off";
            10: bits(SPECIAL_FUNCTION_FLAGS), RW, "Special function", "Bit field";
            11: DEG, RW, "T1s Zone 1", "Water temp Zone 1";
            12: DEG, RW, "T1s2 Zone 2", "Water temp Zone 2";
            13: plain("s"), RW, "t_antilock", "SV antilock time, 0-60s";
            14: ON_OFF, RW, "Power Zone 2", "0=off, 1=on";
            15: ON_OFF, RW, "Power DHW", "0=off, 1=on";
            16: ON_OFF, RW, "Power Zone 1", "0=off, 1=on";
            17: ON_OFF, RW, "Power Zone 1/2 room", "Room temp control, 0=off, 1=on";
            18: U16, RW, "Temp curve Zone 1", "Curves 1-9";
            19: U16, RW, "Temp curve Zone 2", "Curves 1-9";
            20: enumerated(SILENT_LEVEL), RW, "Silent mode level", "0=Level1, 1=Level2, 2=Boost";
            21: bits(FUNCTION_INQUIRY_FLAGS), R_, "Function inquiry", "Bit field";
            22: RESERVED, RW, "Reserved", "";
            100: plain("Hz"), R_, "Compressor frequency", "Hz";
            101: enumerated(OPERATING_MODE), R_, "Operating mode", "0=off, 2=cooling, 3=heating";
            102: plain("r/min"), R_, "Fan speed", "r/min";
            103: plain("P"), R_, "EXV1 openness", "P";
            104: CEL, R_, "Tw_in", "Water inlet temp";
            105: CEL, R_, "Tw_out", "Water outlet temp";
            106: CEL, R_, "T3", "Condenser temp", sentinel = 0xFFFF;
            107: CEL, R_, "T4", "Outdoor ambient temp";
            108: CEL, R_, "Tp", "Discharge temp";
            109: CEL, R_, "Th", "Suction temp";
            110: CEL, R_, "T1", "Total outlet water temp";
            111: CEL, R_, "Tw2", "Zone 2 water temp";
            112: CEL, R_, "T2", "Refrigerant liquid side temp";
            113: CEL, R_, "T2B", "Refrigerant gas side temp";
            114: CEL, R_, "Ta", "Room temp";
            115: CEL, R_, "T5", "DHW tank temp";
            116: plain("kPa"), R_, "P1", "High pressure, kPa";
            117: plain("kPa"), R_, "P2", "Low pressure, kPa";
            118: scale(10, "A"), R_, "ODU current", "A (x0.1)";
            119: plain("V"), R_, "ODU voltage", "V";
            120: CEL, R_, "Tbt1", "Buffer tank top temp", sentinel = 0xFF;
            121: CEL, R_, "Tbt2", "Buffer tank bottom temp", sentinel = 0xFF;
            122: plain("h"), R_, "Compressor time", "hours";
            123: plain("kW"), R_, "Unit capacity", "kW";
            124: enumerated(ERROR_CODES), R_, "Current error", "Error code";
            125: RESERVED, R_, "Reserved", "";
            126: RESERVED, R_, "Reserved", "";
            127: RESERVED, R_, "Reserved", "";
            128: bits(STATUS_1_FLAGS), R_, "Status bit 1", "Bit field";
            129: bits(LOAD_OUTPUT_FLAGS), R_, "Load output", "Bit field";
            130: U16, R_, "IDU software version", "1-99";
            131: U16, R_, "HMI software version", "Reserved";
            132: plain("Hz"), R_, "Unit target frequency", "Hz";
            133: scale(10, "A"), R_, "DC bus current", "A (x0.1)";
            134: scale(10, "V"), R_, "DC bus voltage", "V (/10)";
            135: CEL, R_, "TF", "PCB module temp";
            136: DEG, R_, "Temp curve T1s calc 1", "calculated", sentinel = 0xFF;
            137: DEG, R_, "Temp curve T1s calc 2", "calculated", sentinel = 0xFF;
            138: scale(100, "m³/h"), R_, "Water flow", "m3/h (x0.01)";
            139: U16, R_, "ODU current limit", "Code";
            140: KW, R_, "Hydraulic module capacity", "kW (x0.01)";
            141: CEL, R_, "Tsolar", "Solar panel temp", sentinel = 0xFF;
            142: UNDOCUMENTED_BITS, R_, "Slave unit status", "Bit field";
            143: HI, R_, "Energy consumption high", "kWh (x0.01, high 16 bits)";
            144: LO, R_, "Energy consumption low", "kWh (x0.01, low 16 bits)";
            145: HI, R_, "Power output high", "kWh (x0.01)";
            146: LO, R_, "Power output low", "kWh (x0.01)";
            147: RESERVED, R_, "Reserved", "";
            148: KW, R_, "Real-time heating capacity", "kW (x0.01)";
            149: KW, R_, "Real-time renewable heating", "kW (x0.01)";
            150: KW, R_, "Real-time heating power", "kW (x0.01)";
            151: COP, R_, "Real-time heating COP", "x0.01";
            152: HI, R_, "Cum system heating high", "kWh (x0.01)";
            153: LO, R_, "Cum system heating low", "kWh (x0.01)";
            154: HI, R_, "Cum renewable heating high", "kWh (x0.01)";
            155: LO, R_, "Cum renewable heating low", "kWh (x0.01)";
            156: HI, R_, "Cum system power high", "kWh (x0.01)";
            157: LO, R_, "Cum system power low", "kWh (x0.01)";
            158: HI, R_, "Cum heating energy high", "kWh (x0.01)";
            159: LO, R_, "Cum heating energy low", "kWh (x0.01)";
            160: HI, R_, "Cum renewable energy high", "kWh (x0.01)";
            161: LO, R_, "Cum renewable energy low", "kWh (x0.01)";
            162: HI, R_, "Cum heating power high", "kWh (x0.01)";
            163: LO, R_, "Cum heating power low", "kWh (x0.01)";
            164: COP, R_, "Cum heating efficiency", "x0.01";
            165: KWH, R_, "Cum cooling energy high", "kWh (x0.01)";
            166: KWH, R_, "Cum cooling energy low", "kWh (x0.01)";
            167: KWH, R_, "Cum renewable cooling high", "kWh (x0.01)";
            168: KWH, R_, "Cum renewable cooling low", "kWh (x0.01)";
            169: KWH, R_, "Cum cooling power high", "kWh (x0.01)";
            170: KWH, R_, "Cum cooling power low", "kWh (x0.01)";
            171: COP, R_, "Cum cooling efficiency", "x0.01";
            172: KWH, R_, "Cum DHW energy high", "kWh (x0.01)";
            173: KWH, R_, "Cum DHW energy low", "kWh (x0.01)";
            174: KWH, R_, "Cum DHW renewable high", "kWh (x0.01)";
            175: KWH, R_, "Cum DHW renewable low", "kWh (x0.01)";
            176: KWH, R_, "Cum DHW power high", "kWh (x0.01)";
            177: KWH, R_, "Cum DHW power low", "kWh (x0.01)";
            178: COP, R_, "Cum DHW COP", "x0.01";
            179: KW, R_, "Real-time cooling capacity", "kW (x0.01)";
            180: KW, R_, "Real-time renewable cooling", "kW (x0.01)";
            181: KW, R_, "Real-time cooling power", "kW (x0.01)";
            182: COP, R_, "Real-time cooling EER", "x0.01";
            183: KW, R_, "Real-time DHW capacity", "kW (x0.01)";
            184: KW, R_, "Real-time DHW renewable", "kW (x0.01)";
            185: KW, R_, "Real-time DHW power", "kW (x0.01)";
            186: COP, R_, "Real-time DHW COP", "x0.01";
            187: U16, R_, "Modbus protocol version", "e.g. 46=V4.6";
            188: enumerated(NO_ERROR), R_, "Error code 2", "See table 2";
            189: bits(STATUS_2_FLAGS), R_, "Status bit 2", "Bit field";
            190: enumerated(SUB_MODELS), R_, "Hydraulic module sub-model", "0-10";
            191: CEL, R_, "TL", "ODU refrigerant pipe temp", sentinel = 0xFFFF;
            192: scale(10, "%"), R_, "Pump_i PWM", "x10";
            193: scale(10, "°C"), R_, "T9i", "2nd PHE inlet temp (x10)";
            194: scale(10, "°C"), R_, "T9o", "2nd PHE outlet temp (x10)";
            195: plain("P"), R_, "EXV2 openness", "P";
            196: plain("P"), R_, "EXV3 openness", "P";
            197: plain("r/min"), R_, "Fan2 speed", "r/min";
            198: bits(STATUS_3_FLAGS), R_, "Status bit 3", "Bit field";
            199: enumerated(HEAT_PUMP_MODE), R_, "Heat pump operation mode", "0=Off, 2=Cool, 3=Heat, 5=DHW";
            201: ZONES, R_, "T1s cooling upper limit", "Zone1 (low 8), Zone2 (high 8)";
            202: ZONES, R_, "T1s cooling lower limit", "Zone1 (low 8), Zone2 (high 8)";
            203: ZONES, R_, "T1s heating upper limit", "Zone1 (low 8), Zone2 (high 8)";
            204: ZONES, R_, "T1s heating lower limit", "Zone1 (low 8), Zone2 (high 8)";
            205: scale(2, "°C"), R_, "Tas upper limit", "x2";
            206: scale(2, "°C"), R_, "Tas lower limit", "x2";
            207: DEG, R_, "T5s upper limit", "DHW";
            208: DEG, R_, "T5s lower limit", "DHW";
            209: MIN, RW, "Pump_D running time", "5-120 min";
            210: bits(PARAMETER_1_FLAGS), RW, "Parameter setting 1", "Bit field";
            211: bits(PARAMETER_2_FLAGS), RW, "Parameter setting 2", "Bit field";
            212: DEG, RW, "dT5_On", "DHW start differential";
            213: DEG, RW, "dT1S5", "DHW/Zone temp diff";
            215: CEL, RW, "T4DHWmax", "DHW outdoor max temp";
            216: CEL, RW, "T4DHWmin", "DHW outdoor min temp";
            217: MIN, RW, "t_TBH_delay", "TBH delay, min";
            218: DEG, RW, "dT5_TBH_off", "TBH off differential";
            219: CEL, RW, "T4_TBH_on", "TBH enable outdoor temp";
            220: DEG, RW, "T5s_DI", "Disinfection temp";
            221: MIN, RW, "t_DI_max", "Disinfection max time, min";
            222: MIN, RW, "t_DI_hightemp", "High temp hold time, min";
            224: DEG, RW, "dT1SC", "Cooling curve delta";
            225: DEG, RW, "dTSC", "Cooling setback";
            226: CEL, RW, "T4cmax", "Cooling outdoor max";
            227: CEL, RW, "T4cmin", "Cooling outdoor min";
            229: DEG, RW, "dT1SH", "Heating curve delta";
            230: DEG, RW, "dTSH", "Heating setback";
            231: CEL, RW, "T4hmax", "Heating outdoor max";
            232: CEL, RW, "T4hmin", "Heating outdoor min";
            233: CEL, RW, "T4_IBH_on", "IBH enable temp";
            234: DEG, RW, "dT1_IBH_on", "IBH delta";
            235: MIN, RW, "t_IBH_delay", "IBH delay, min";
            237: CEL, RW, "T4_AHS_on", "AHS enable temp";
            238: DEG, RW, "dT1_AHS_on", "AHS delta";
            240: MIN, RW, "t_AHS_delay", "AHS delay, min";
            241: MIN, RW, "t_DHWHP_max", "DHW HP max time, min";
            242: MIN, RW, "t_DHWHP_restrict", "DHW HP restrict time, min";
            243: CEL, RW, "T4autocmin", "Auto cooling min outdoor";
            244: CEL, RW, "T4autohmax", "Auto heating max outdoor";
            245: DEG, RW, "T1S_H.A_H", "Holiday heating T1";
            246: DEG, RW, "T5S_H.A_DHW", "Holiday DHW T5";
            250: multiple(100, "W"), RW, "IBH1 power", "x100 W";
            251: multiple(100, "W"), RW, "IBH2 power", "x100 W";
            252: multiple(100, "W"), RW, "TBH power", "x100 W";
            255: plain("days"), RW, "t_DRYUP", "Floor dry up days";
            256: plain("days"), RW, "t_HIGHPEAK", "Floor dry peak days";
            257: plain("days"), RW, "t_DRYDOWN", "Floor dry down days";
            258: DEG, RW, "t_DRYPEAK", "Floor dry peak temp";
            259: plain("h"), RW, "t_ARSTH", "Anti-freeze reset time, hrs";
            260: DEG, RW, "T1S preheating", "Floor preheat temp";
            261: DEG, RW, "T1SetC1", "Custom curve cooling T1 point 1";
            262: DEG, RW, "T1SetC2", "Custom curve cooling T1 point 2";
            263: CEL, RW, "T4C1", "Custom curve cooling T4 point 1";
            264: CEL, RW, "T4C2", "Custom curve cooling T4 point 2";
            265: DEG, RW, "T1SetH1", "Custom curve heating T1 point 1";
            266: DEG, RW, "T1SetH2", "Custom curve heating T1 point 2";
            267: CEL, RW, "T4H1", "Custom curve heating T4 point 1";
            268: CEL, RW, "T4H2", "Custom curve heating T4 point 2";
            269: U16, RW, "Power input limitation", "Level";
            270: pair("Heating", "Cooling"), RW, "T4_Fresh", "Hi=Cooling, Lo=Heating";
            271: U16, RW, "t_Delay pump", "pump delay";
            272: U16, RW, "Emission type", "Zone H/C emission type";
            273: pair("Solar function", "Deltatsol"), RW, "Deltatsol / Solar function", "Hi=deltatsol, Lo=solar func";
            274: UNDOCUMENTED_BITS, RW, "AHS_PDC", "Bit field";
            275: COP, RW, "GAS-COST", "x100";
            276: COP, RW, "ELE-COST", "x100";
            277: pair("Min", "Max"), RW, "SETHEATER", "Hi=max, Lo=min";
            278: pair("Min", "Max"), RW, "SIGHEATER", "Hi=max, Lo=min, V";
            279: plain("s"), RW, "t2_Antilock SV run", "s";
            288: CEL, RW, "Ta_adj", "Room temp adjustment";
            289: enumerated(ENABLED), RW, "TBHEnFunc", "TBH enable";
            290: scale(10, "kW"), RW, "High price compressor limit", "x10, kW";
        }
    };
}

macro_rules! optional {
    () => {
        None
    };
    ($($lit: tt)+) => {
        Some($($lit)*)
    };
}

macro_rules! make_lists {
    ($($regnum: literal: $enc: expr, $mode: ident, $name: literal, $summary: literal $(, sentinel = $sentinel: literal)?;)+) => {
        pub static ADDRESSES: &[u16] = &[$($regnum),*];
        pub static NAMES: &[&str] = &[$($name),*];
        pub static SUMMARIES: &[&str] = &[$($summary),*];
        pub static MODES: &[Mode] = &[$(Mode::$mode),*];
        pub static ENCODINGS: &[Encoding] = &[$($enc),*];
        pub static SENTINELS: &[Option<u16>] = &[$(optional!($($sentinel)?)),*];
    };
}

for_each_register!(make_lists);

pub static DESCRIPTIONS: &[&str] = &const {
    let mut result = [""; ADDRESSES.len()];
    let mut index = 0;
    let mut previous_address = None;
    while index < result.len() {
        let address = ADDRESSES[index];
        if let Some(previous) = previous_address {
            if address <= previous {
                panic!("ADDRESSES is not sorted (or has duplicate values)!");
            }
        }
        previous_address = Some(address);
        result[index] = match address {
            0 => {
                "Master power bits. Bit 0: Zone 1/2 room temperature control, bit 1: Zone 1 water \
                 temperature control, bit 2: DHW, bit 3: Zone 2 water temperature control. The \
                 individual switches in registers 14-17 are preferred for control."
            }
            1 => {
                "Requested operating mode. 1=Auto switches between heating and cooling by outdoor \
                 temperature, 2=Cooling, 3=Heating. Other values are invalid."
            }
            2 => {
                "Water temperature setpoints of both zones packed into one word, Zone 1 in the low \
                 byte, Zone 2 in the high byte. 7708 = 0x1E1C is Zone 1 28 °C, Zone 2 30 °C. \
                 Writes must preserve the other zone's byte, registers 11 and 12 set one zone each."
            }
            3 => {
                "Room air setpoint for room thermostat control, typically 16-30 °C. Only used when \
                 room temperature control (register 17) is on."
            }
            4 => {
                "Domestic hot water tank setpoint, typically 40-60 °C. Only relevant with the DHW \
                 function enabled."
            }
            5 => {
                "Bit 0: refrigerant leak detection, bit 4: disinfection timer, bit 5: holiday away \
                 (read-only), bit 6: silent mode, bit 7: silent level (0=level 1, 1=level 2), bit \
                 8: holiday home (read-only), bit 10: ECO mode, bit 11: DHW circulation pump, bit \
                 12: climate curve Zone 1, bit 13: climate curve Zone 2, bit 14: C2 fault restore."
            }
            6 => {
                "Weather compensation curve (1-9) of both zones, Zone 1 in the low byte, Zone 2 in \
                 the high byte. Registers 18 and 19 set one zone each."
            }
            7 => {
                "Force DHW heating regardless of schedule and thermostat. 0=Normal operation, \
                 1=Force on, 2=Force off."
            }
            8 => {
                "Force the tank booster heater (electric heater in the DHW tank). 0=Normal \
                 operation, 1=Force on, 2=Force off. Cannot run together with the IBH."
            }
            9 => {
                "Force the inline booster heater (electric heater in the water circuit). 0=Normal \
                 operation, 1=Force on, 2=Force off. IBH1 and IBH2 may run together."
            }
            10 => {
                "Bit 1: third-party SG1 smart grid signal, bit 2: SG2/EVU utility signal. Used for \
                 demand response and electricity price signals."
            }
            11 => {
                "Zone 1 water setpoint in °C. Sets one zone without touching the packed register \
                 2."
            }
            12 => "Zone 2 water setpoint in °C, dual-zone installations only.",
            13 => {
                "Anti-lock exercise time of solenoid valves SV1 and SV4 in seconds, keeps idle \
                 valves from seizing."
            }
            14 => "Zone 2 water temperature control on/off.",
            15 => "Domestic hot water tank heating on/off.",
            16 => {
                "Zone 1 water temperature control on/off. The main switch of single-zone \
                 installations."
            }
            17 => {
                "Room temperature control for both zones. When on, the room thermostat (Ta) is \
                 used instead of the water temperature (T1s)."
            }
            18 => {
                "Weather compensation curve of Zone 1, 1-9. Each curve maps outdoor temperature to \
                 water temperature, curve 9 is the custom curve defined by registers 265-268."
            }
            19 => "Weather compensation curve of Zone 2, 1-9. Dual-zone installations only.",
            20 => {
                "0=Silent level 1 (moderate), 1=Silent level 2 (quietest, reduced capacity), \
                 2=Boost (maximum capacity, some units only)."
            }
            21 => "Read-only state of timed functions. Bit 4: disinfection running.",
            22 | 125 | 126 | 127 | 147 => "Reserved, typically reads 0.",
            100 => {
                "Actual compressor frequency. 0 means the compressor is off, higher frequencies \
                 give more capacity at higher power consumption."
            }
            101 => {
                "Current state, not the setpoint. 0=Off/standby, 2=Cooling, 3=Heating. Register \
                 199 is more detailed."
            }
            102 => "Outdoor fan speed, varies with load and ambient conditions.",
            103 => "Opening of expansion valve 1 in pulses. Higher means more refrigerant flow.",
            104 => {
                "Water inlet of the plate heat exchanger, i.e. the return from the heating system."
            }
            105 => {
                "Water outlet of the plate heat exchanger, i.e. the supply to the heating system."
            }
            106 => "Condenser refrigerant temperature. 65535 means the sensor is absent or faulty.",
            107 => "Outdoor air temperature, drives weather compensation and defrost.",
            108 => {
                "Compressor discharge (hot gas) temperature, typically 50-90 °C while running. \
                 High values trigger protection."
            }
            109 => {
                "Compressor suction temperature, used for superheat. Low values may mean liquid \
                 refrigerant reaches the compressor."
            }
            110 => {
                "Outlet water temperature after mixing. Equals Tw_out in single-zone \
                 installations."
            }
            111 => "Zone 2 circuit temperature. Reads 25 when Zone 2 or its sensor is absent.",
            112 => "Liquid line temperature before the expansion valve, used for subcooling.",
            113 => "Gas line temperature, used for superheat together with Th.",
            114 => {
                "Room temperature from the wired controller or a remote sensor. Reads 25 without \
                 one."
            }
            115 => "DHW tank temperature. Reads 25 without a tank or tank sensor.",
            116 => {
                "High-side refrigerant pressure. The safety cut-off usually trips above about \
                 4000 kPa."
            }
            117 => {
                "Low-side refrigerant pressure. Very low values indicate a leak or restriction, \
                 also used for defrost detection."
            }
            118 => "Total outdoor unit current in tenths of an ampere, e.g. 30 is 3.0 A.",
            119 => {
                "Outdoor unit supply voltage, 220-240 V in the EU. Undervoltage strains the \
                 compressor."
            }
            120 => "Buffer tank top temperature. 255 when no buffer tank is installed.",
            121 => "Buffer tank bottom temperature. 255 when no buffer tank is installed.",
            122 => "Total compressor running hours, for maintenance and warranty.",
            123 => "Nominal capacity of the unit, e.g. 10 is a 10 kW unit.",
            124 => {
                "Active error code, 0 when there is none. 1=E0 water flow, 2=E1 phase, 3=E2 \
                 communication, 9=E8 flow fault, 20=P0 low pressure, 21=P1 high pressure, 24=P4 \
                 high discharge temperature."
            }
            128 => {
                "Bit 1: defrosting, bit 2: anti-freeze, bit 3: oil return, bit 4: remote on/off \
                 valid, bit 6: HT room thermostat, bit 7: CL room thermostat, bit 8: solar thermal \
                 signal, bit 9: DHW anti-freeze, bit 10: SG, bit 11: EVU."
            }
            129 => {
                "Outputs currently energised. Bit 0: IBH1, bit 1: IBH2, bit 2: TBH, bit 3: Pump_i, \
                 bit 4: SV1, bit 5: SV2, bit 6: Pump_o, bit 7: Pump_d, bit 8: Pump_c, bit 9: SV3, \
                 bit 10: crankcase heater, bit 11: Pump_s, bit 12: alarm, bit 14: AHS."
            }
            130 => "Software version of the indoor (hydraulic) unit controller, e.g. 19.",
            131 => "Software version of the wired controller. May equal the indoor unit version.",
            132 => {
                "Frequency requested by the controller. Differs from register 100 while the \
                 compressor ramps up or down."
            }
            133 => "Inverter DC bus current in tenths of an ampere, e.g. 40 is 4.0 A.",
            134 => "Inverter DC bus voltage in tens of volts, e.g. 37 is 370 V.",
            135 => {
                "Power module temperature. High values point to poor cooling of the outdoor unit \
                 electronics or a hot environment."
            }
            136 => {
                "Water target computed from the Zone 1 weather curve. 255 when no curve is active."
            }
            137 => {
                "Water target computed from the Zone 2 weather curve. 255 when no curve is active."
            }
            138 => "Flow through the heat exchanger, e.g. 106 is 1.06 m³/h. Low flow raises E8.",
            139 => {
                "Current limitation level of the outdoor unit, set by the grid signals or \
                 settings."
            }
            140 => "Thermal output of the hydraulic module, e.g. 349 is 3.49 kW.",
            141 => "Solar thermal panel temperature. 255 when no solar kit is installed.",
            142 => "Status of slave units in cascade systems. 0 for a single unit.",
            143 => "Electricity consumed, high word. Total = (143 * 65536 + 144) / 100 kWh.",
            144 => "Electricity consumed, low word. This is the electrical input of the heat pump.",
            145 => "Heat delivered, high word. Total = (145 * 65536 + 146) / 100 kWh.",
            146 => "Heat delivered, low word. This is the heat put into the water circuit.",
            148 => "Heat currently delivered, computed from water flow and temperature difference.",
            149 => "Energy currently extracted from the outdoor air.",
            150 => "Electrical power currently used for heating. COP = 148 / 150.",
            151 => "Instantaneous COP, e.g. 414 is 4.14. Typically between 2.5 and 5.",
            152 => "Cumulative system heating energy, high word of 152/153.",
            153 => "Cumulative system heating energy, low word of 152/153.",
            154 => "Cumulative renewable heating energy, high word of 154/155.",
            155 => "Cumulative renewable heating energy, low word of 154/155.",
            156 => "Cumulative system electricity consumption, high word of 156/157.",
            157 => "Cumulative system electricity consumption, low word of 156/157.",
            158 => "Cumulative heat delivered in heating mode, high word of 158/159.",
            159 => "Cumulative heat delivered in heating mode, low word of 158/159.",
            160 => "Cumulative renewable contribution, high word of 160/161.",
            161 => "Cumulative renewable contribution, low word of 160/161.",
            162 => "Cumulative electricity used in heating mode, high word of 162/163.",
            163 => "Cumulative electricity used in heating mode, low word of 162/163.",
            164 => "Seasonal heating efficiency (SCOP) over the unit's lifetime, e.g. 362 is 3.62.",
            165 => "Cumulative cooling energy, high word.",
            166 => "Cumulative cooling energy, low word.",
            167 => "Cumulative renewable cooling energy, high word.",
            168 => "Cumulative renewable cooling energy, low word.",
            169 => "Cumulative electricity used for cooling, high word.",
            170 => "Cumulative electricity used for cooling, low word.",
            171 => "Seasonal cooling efficiency (SEER).",
            172 => "Cumulative DHW energy, high word.",
            173 => "Cumulative DHW energy, low word.",
            174 => "Cumulative renewable DHW energy, high word.",
            175 => "Cumulative renewable DHW energy, low word.",
            176 => "Cumulative electricity used for DHW, high word.",
            177 => "Cumulative electricity used for DHW, low word.",
            178 => "Cumulative DHW efficiency.",
            179 => "Cooling capacity currently delivered. Only valid in cooling mode.",
            180 => "Renewable contribution to cooling right now.",
            181 => "Electrical power currently used for cooling.",
            182 => "Instantaneous cooling energy efficiency ratio.",
            183 => "DHW heating capacity currently delivered.",
            184 => "Renewable contribution to DHW heating right now.",
            185 => "Electrical power currently used for DHW.",
            186 => "Instantaneous DHW COP.",
            187 => "Protocol version, e.g. 46 is V4.6. Newer versions may add registers.",
            188 => "Secondary error code, 0 when there is none.",
            189 => {
                "Bit 7: supply (0=single-phase, 1=three-phase), bit 8: temperature resolution \
                 (0=1 °C, 1=0.1 °C)."
            }
            190 => {
                "Hydraulic module type. 0=R32-P, 1=Aqua, 2=C-R32-P, 3=R290-A, 4=R290-N, \
                 5=C-R290-A, 6=C-R290-N, 7=R32-A, 8=C-R32-A, 9=R290-M, 10=R32-H."
            }
            191 => "Outdoor unit refrigerant pipe temperature. 65535 when the sensor is absent.",
            192 => {
                "Internal circulation pump duty cycle in tenths of a percent, e.g. 200 is 20.0 %."
            }
            193 => "Inlet of the second plate heat exchanger. Cascade systems only.",
            194 => "Outlet of the second plate heat exchanger. Cascade systems only.",
            195 => "Opening of expansion valve 2 in pulses. Dual-circuit units only.",
            196 => "Opening of expansion valve 3 in pulses. Specific models only.",
            197 => "Second outdoor fan speed. Dual-fan units only.",
            198 => {
                "Bit 3: cooling, bit 4: heating, bit 5: DHW, bit 8: energy metering, bit 9: T1 \
                 sensor, bit 10: IBH enabled, bit 11: AHS mode (0=heating only, 1=heating and \
                 DHW), bit 14: AHS enabled, bit 15: TBH enabled."
            }
            199 => {
                "Current heat pump operation. 0=Off/standby, 2=Cooling, 3=Heating, 5=DHW. More \
                 detailed than register 101."
            }
            201 => {
                "Highest cooling setpoint allowed, Zone 1 in the low byte, Zone 2 in the high \
                 byte."
            }
            202 => {
                "Lowest cooling setpoint allowed, Zone 1 in the low byte, Zone 2 in the high byte."
            }
            203 => {
                "Highest heating setpoint allowed per zone, e.g. 55 °C for Zone 1 in the low byte."
            }
            204 => {
                "Lowest heating setpoint allowed per zone, e.g. 25 °C for Zone 1 in the low byte."
            }
            205 => "Highest room setpoint, stored doubled, e.g. 60 is 30 °C.",
            206 => "Lowest room setpoint, stored doubled, e.g. 34 is 17 °C.",
            207 => "Highest DHW tank setpoint allowed.",
            208 => "Lowest DHW tank setpoint allowed.",
            209 => "Run time of the DHW circulation pump per cycle, 5-120 minutes. Defaults to 5.",
            210 => {
                "Bit 0: DHW priority, bit 1: room thermostat dual zone, bit 2: RT mode set, bit 3: \
                 RT function, bit 4: room temperature function, bit 5: Pump_i silent, bit 7: \
                 heating, bit 9: cooling, bit 10: Pump_d disinfection, bit 11: DHW priority \
                 function, bit 12: Pump_d function, bit 13: disinfection function, bit 15: DHW \
                 function."
            }
            211 => {
                "Bit 1: Tbt function, bit 3: double zone, bit 7: smart grid, bit 8: M1M2 drives \
                 (0=remote, 1=TBH), bit 9: solar kit, bit 10: solar control, bit 11: pipe length \
                 at least 10 m, bit 12: Tbt1 function, bit 13: T1T2 setting, bit 14: M1M2 AHS, \
                 bit 15: ACS status (read-only)."
            }
            212 => "DHW heating starts when T5 drops this many degrees below the setpoint.",
            213 => "Temperature difference between the DHW and zone setpoints.",
            215 => "DHW heating by the heat pump is disabled above this outdoor temperature.",
            216 => {
                "Below this outdoor temperature the tank booster heater may be needed for DHW. \
                 Negative values are two's complement, e.g. 65526 is -10 °C."
            }
            217 => {
                "Delay before the tank booster heater starts, giving the heat pump a head start."
            }
            218 => "The tank booster heater stops this many degrees below the setpoint.",
            219 => "The tank booster heater may start below this outdoor temperature.",
            220 => "Legionella disinfection temperature, typically 60-65 °C.",
            221 => "Disinfection aborts if the temperature is not reached within this time.",
            222 => "How long the disinfection temperature is held once reached.",
            224 => "Dead band of the cooling weather curve.",
            225 => "Temperature setback in cooling mode.",
            226 => "Cooling is reduced or stopped above this outdoor temperature.",
            227 => "Cooling is disabled below this outdoor temperature.",
            229 => "Dead band of the heating weather curve, affects how fast the system reacts.",
            230 => "Temperature setback in heating mode, e.g. for night or ECO reduction.",
            231 => {
                "Heating is disabled above this outdoor temperature, e.g. 25 °C as summer cut-off."
            }
            232 => {
                "Below this outdoor temperature backup heaters may be needed, e.g. 65521 is \
                 -15 °C."
            }
            233 => {
                "The inline booster heater may start below this outdoor temperature, e.g. 65531 is \
                 -5 °C."
            }
            234 => {
                "The inline booster heater starts when the water is this far below the setpoint."
            }
            235 => "Delay before the inline booster heater starts once its conditions hold.",
            237 => "The auxiliary heat source may start below this outdoor temperature.",
            238 => {
                "The auxiliary heat source starts when the water is this far below the setpoint."
            }
            240 => "Delay before the auxiliary heat source starts once its conditions hold.",
            241 => "Longest continuous DHW run of the heat pump before space heating gets a turn.",
            242 => "Shortest pause between DHW heating cycles.",
            243 => "Auto mode switches to cooling only above this outdoor temperature.",
            244 => "Auto mode stays in heating only below this outdoor temperature.",
            245 => "Water setpoint for heating while on holiday.",
            246 => "DHW setpoint while on holiday.",
            250 => "Rating of inline booster heater 1 in hundreds of watts, e.g. 20 is 2000 W.",
            251 => "Rating of inline booster heater 2 in hundreds of watts.",
            252 => "Rating of the tank booster heater in hundreds of watts.",
            255 => "Floor drying, duration of the warm-up phase.",
            256 => "Floor drying, duration of the peak phase.",
            257 => "Floor drying, duration of the cool-down phase.",
            258 => "Floor drying, peak water temperature.",
            259 => "Hours after an anti-freeze event before normal operation resumes.",
            260 => "Water temperature of the floor preheating function.",
            261 => "Custom cooling curve, water temperature at outdoor temperature T4C1.",
            262 => "Custom cooling curve, water temperature at outdoor temperature T4C2.",
            263 => "Custom cooling curve, outdoor temperature of the warmer point.",
            264 => "Custom cooling curve, outdoor temperature of the colder point.",
            265 => "Custom heating curve, water temperature at outdoor temperature T4H1.",
            266 => "Custom heating curve, water temperature at outdoor temperature T4H2.",
            267 => {
                "Custom heating curve, outdoor temperature of the colder point, e.g. 65531 is -5 \
                 °C."
            }
            268 => {
                "Custom heating curve, outdoor temperature of the warmer point. T4H1=-5 °C at \
                 35 °C and T4H2=7 °C at 28 °C define the slope."
            }
            269 => "Caps compressor frequency and thereby power consumption and capacity.",
            270 => {
                "Fresh air temperature thresholds, heating in the low byte, cooling in the high \
                 byte."
            }
            271 => "How long the circulation pump keeps running after the compressor stops.",
            272 => {
                "Emitter type per nibble: Zone 1 heating, Zone 2 heating, Zone 1 cooling, Zone 2 \
                 cooling. 0=FLH (underfloor), 1=FCU (fan coil), 2=RAD (radiator)."
            }
            273 => {
                "Solar thermal settings. Low byte: 0=no solar, 1=solar and heat pump, 2=solar \
                 only. High byte: solar temperature differential."
            }
            274 => "Auxiliary heat source and power demand control settings.",
            275 => "Gas price per unit for hybrid efficiency calculations, in hundredths.",
            276 => "Electricity price per unit for efficiency calculations, in hundredths.",
            277 => {
                "External heater temperature range, minimum in the low byte, maximum in the high \
                 byte."
            }
            278 => {
                "External heater signal voltage range, minimum in the low byte, maximum in the \
                 high byte."
            }
            279 => "Run time of the solenoid valve anti-lock exercise.",
            288 => "Calibration offset of the room temperature sensor.",
            289 => "Tank booster heater function. 0=Disabled, 1=Enabled.",
            290 => "Compressor power cap during high electricity prices, in tenths of a kW.",
            _ => "",
        };
        index += 1;
    }
    result
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_addresses() {
        for address in 23..=99 {
            assert!(lookup(address).is_none(), "{address} should be unknown");
        }
        for address in [200, 214, 223, 228, 236, 239, 247, 280, 287] {
            assert!(lookup(address).is_none(), "{address} should be unknown");
        }
        assert!(lookup(291).is_none());
        assert!(lookup(u16::MAX).is_none());
    }

    #[test]
    fn reserved_addresses_are_catalogued() {
        for address in [22, 125, 126, 127, 147] {
            let register = lookup(address).unwrap();
            assert_eq!(register.name(), "Reserved");
            assert_eq!(register.encoding(), Encoding::U16);
            assert!(!register.description().is_empty());
        }
        assert!(is_writable(22));
        assert!(!is_writable(125));
        assert!(!is_writable(147));
    }

    #[test]
    fn forced_modes_agree_with_their_summary() {
        for address in [7, 8, 9] {
            let register = lookup(address).unwrap();
            let Encoding::Enumerated(labels) = register.encoding() else { panic!() };
            for (raw, label) in labels {
                assert!(register.summary().contains(&format!("{raw}={label}")), "{address}");
            }
            assert_eq!(register.decode(0), Value::Enumerated { raw: 0, label: Some("Normal") });
        }
    }

    #[test]
    fn every_register_is_described() {
        for register in RegisterIndex::all() {
            let address = register.address();
            assert!(!register.description().is_empty(), "{address} has no description");
        }
    }

    #[test]
    fn lookup_finds_every_entry() {
        for register in RegisterIndex::all() {
            assert_eq!(lookup(register.address()), Some(register));
        }
        assert_eq!(lookup(2).map(|r| r.name()), Some("Set water temp T1s"));
        assert_eq!(lookup(290).map(|r| r.name()), Some("High price compressor limit"));
    }

    #[test]
    fn writable_ranges() {
        for address in (0..=20).chain([22]) {
            assert!(is_writable(address), "{address} should be writable");
        }
        for address in [21].into_iter().chain(23..=208).chain(300..400) {
            assert!(!is_writable(address), "{address} should be read-only");
        }
        for register in RegisterIndex::all().filter(|r| r.address() >= 209) {
            assert!(register.is_writable());
        }
    }

    #[test]
    fn parallel_lists_agree() {
        let n = ADDRESSES.len();
        assert_eq!(NAMES.len(), n);
        assert_eq!(SUMMARIES.len(), n);
        assert_eq!(MODES.len(), n);
        assert_eq!(ENCODINGS.len(), n);
        assert_eq!(SENTINELS.len(), n);
        assert_eq!(DESCRIPTIONS.len(), n);
        assert!(ADDRESSES.iter().all(|&a| a <= 290));
    }

    #[test]
    fn packed_registers() {
        let packed = RegisterIndex::all().filter(|r| r.is_packed()).map(|r| r.address());
        assert_eq!(
            packed.collect::<Vec<_>>(),
            vec![2, 6, 201, 202, 203, 204, 270, 273, 277, 278]
        );
    }

    #[test]
    fn sentinel_registers() {
        let with_sentinel = RegisterIndex::all()
            .filter_map(|r| Some((r.address(), r.sentinel()?)))
            .collect::<Vec<_>>();
        assert_eq!(
            with_sentinel,
            vec![
                (106, 0xFFFF),
                (120, 0xFF),
                (121, 0xFF),
                (136, 0xFF),
                (137, 0xFF),
                (141, 0xFF),
                (191, 0xFFFF)
            ]
        );
    }

    #[test]
    fn mode_display() {
        assert_eq!(Mode::RW.to_string(), "RW");
        assert_eq!(Mode::R.to_string(), "R-");
    }
}
