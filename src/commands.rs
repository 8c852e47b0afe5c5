use crate::codec::Value;
use crate::output::{self, Output};
use crate::scan::{Line, Total};

fn block_on<F: Future>(future: F) -> Result<F::Output, std::io::Error> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    Ok(runtime.block_on(future))
}

#[derive(serde::Serialize)]
struct ReadingRecord {
    address: u16,
    name: Option<&'static str>,
    raw: u16,
    value: Value,
    summary: &'static str,
}

#[derive(serde::Serialize)]
struct TotalRecord {
    high: u16,
    low: u16,
    name: &'static str,
    kwh: f64,
}

fn output_lines(
    output: &mut Output,
    lines: impl Iterator<Item = Line>,
    details: bool,
) -> Result<(), output::Error> {
    output.table_headers(vec!["Address", "Name", "Value", "Description"])?;
    for line in lines {
        output.result(
            || {
                vec![
                    line.address.to_string(),
                    line.name().to_string(),
                    line.value.to_string(),
                    line.summary().to_string(),
                ]
            },
            || ReadingRecord {
                address: line.address,
                name: line.register.map(|r| r.name()),
                raw: line.value.raw(),
                value: line.value,
                summary: line.summary(),
            },
        )?;
        if let Some(register) = line.register.filter(|_| details) {
            if !register.description().is_empty() {
                output.note(register.description());
            }
        }
    }
    Ok(())
}

fn output_totals(
    output: &mut Output,
    totals: impl Iterator<Item = Total>,
) -> Result<(), output::Error> {
    let mut totals = totals.peekable();
    if totals.peek().is_none() {
        return Ok(());
    }
    output.section("32-bit totals, (high * 65536 + low) / 100");
    for total in totals {
        output.result(
            || {
                vec![
                    format!("{}/{}", total.pair.high, total.pair.low),
                    total.pair.name.to_string(),
                    format!("{:.2} kWh", total.kwh),
                    String::new(),
                ]
            },
            || TotalRecord {
                high: total.pair.high,
                low: total.pair.low,
                name: total.pair.name,
                kwh: total.kwh,
            },
        )?;
    }
    Ok(())
}

pub mod registers {
    use crate::output;
    use crate::registers::{Mode, RegisterIndex};

    /// Search and output known modbus registers.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        output: output::Args,
        /// Show the full description of every register.
        #[arg(long)]
        details: bool,
        /// Only show registers whose address, name or description contains this text.
        filter: Option<String>,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("could not output the register list")]
        Output(#[from] output::Error),
    }

    #[derive(serde::Serialize)]
    pub struct RegisterSchema {
        pub address: u16,
        pub name: &'static str,
        pub mode: Mode,
        pub encoding: String,
        pub sentinel: Option<u16>,
        pub summary: &'static str,
        pub description: &'static str,
    }

    impl RegisterSchema {
        pub fn new(register: RegisterIndex) -> Self {
            RegisterSchema {
                address: register.address(),
                name: register.name(),
                mode: register.mode(),
                encoding: register.encoding().to_string(),
                sentinel: register.sentinel(),
                summary: register.summary(),
                description: register.description(),
            }
        }

        pub fn is_match(&self, pattern: &str) -> bool {
            let pattern = pattern.to_uppercase();
            if self.name.to_uppercase().contains(&pattern) {
                return true;
            }
            if self.summary.to_uppercase().contains(&pattern) {
                return true;
            }
            if self.description.to_uppercase().contains(&pattern) {
                return true;
            }
            if self.address.to_string().contains(&pattern) {
                return true;
            }
            return false;
        }
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let mut output = args.output.to_output()?;
        output.table_headers(vec![
            "Address",
            "Name",
            "Mode",
            "Encoding",
            "Unavailable",
            "Description",
        ])?;
        for register in RegisterIndex::all().map(RegisterSchema::new) {
            if let Some(pattern) = &args.filter {
                if !register.is_match(pattern) {
                    continue;
                }
            }
            output.result(
                || {
                    vec![
                        register.address.to_string(),
                        register.name.to_string(),
                        register.mode.to_string(),
                        register.encoding.clone(),
                        register.sentinel.map(|s| format!("{s:#X}")).unwrap_or_default(),
                        register.summary.to_string(),
                    ]
                },
                || &register,
            )?;
            if args.details && !register.description.is_empty() {
                output.note(register.description);
            }
        }
        output.commit()?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::registers::lookup;

        #[test]
        fn filter_is_case_insensitive() {
            let register = RegisterSchema::new(lookup(2).unwrap());
            assert!(register.is_match("zone1"));
            assert!(register.is_match("2"));
            assert!(!register.is_match("compressor"));
            let frequency = RegisterSchema::new(lookup(100).unwrap());
            assert!(frequency.is_match("COMPRESSOR"));
        }
    }
}

pub mod scan {
    use crate::connection::{self, with_connection};
    use crate::output;
    use tracing::{info, warn};

    /// Read every register of the heat pump and decode it.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        connection: connection::Args,
        #[clap(flatten)]
        output: output::Args,
        /// Show the full description below each documented register.
        #[arg(long)]
        details: bool,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("could not start the async runtime")]
        Runtime(#[source] std::io::Error),
        #[error("reading the registers failed")]
        Connection(#[from] connection::Error),
        #[error("could not output the readings")]
        Output(#[from] output::Error),
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let mut output = args.output.to_output()?;
        let readings = super::block_on(with_connection(args.connection, async |connection| {
            info!(message = "scanning", device_id = connection.device_id());
            crate::scan::scan(connection).await
        }))
        .map_err(Error::Runtime)??;
        info!(message = "scan complete", registers = readings.len());
        if readings.is_empty() {
            warn!("the device did not answer any of the reads");
        }
        super::output_lines(&mut output, crate::scan::report(&readings), args.details)?;
        super::output_totals(&mut output, crate::scan::totals(&readings))?;
        output.commit()?;
        Ok(())
    }
}

pub mod read {
    use crate::connection::{self, with_connection};
    use crate::output;
    use crate::read_plan;
    use std::str::FromStr;
    use tracing::warn;

    /// An address or an inclusive `FIRST-LAST` range of addresses.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AddressRange {
        first: u16,
        last: u16,
    }

    impl FromStr for AddressRange {
        type Err = String;
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let parse = |s: &str| {
                s.trim().parse::<u16>().map_err(|e| format!("`{s}` is not a register address: {e}"))
            };
            let (first, last) = match s.split_once('-') {
                None => (parse(s)?, parse(s)?),
                Some((first, last)) => (parse(first)?, parse(last)?),
            };
            if last < first {
                return Err(format!("range `{s}` ends before it starts"));
            }
            Ok(Self { first, last })
        }
    }

    /// Read specific registers, e.g. `read 2 104-107 216`.
    ///
    /// Registers in 200-290 are read one at a time.
    #[derive(clap::Parser)]
    pub struct Args {
        #[arg(required = true)]
        addresses: Vec<AddressRange>,
        #[clap(flatten)]
        connection: connection::Args,
        #[clap(flatten)]
        output: output::Args,
        /// Show the full description below each documented register.
        #[arg(long)]
        details: bool,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("could not start the async runtime")]
        Runtime(#[source] std::io::Error),
        #[error("reading the registers failed")]
        Connection(#[from] connection::Error),
        #[error("could not output the readings")]
        Output(#[from] output::Error),
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let mut output = args.output.to_output()?;
        let addresses = args.addresses.iter().flat_map(|r| r.first..=r.last);
        let requests = read_plan::plan(addresses.clone());
        let readings = super::block_on(with_connection(args.connection, async |connection| {
            crate::scan::read(connection, &requests).await
        }))
        .map_err(Error::Runtime)??;
        for address in addresses.filter(|a| readings.get(*a).is_none()) {
            warn!(message = "no value could be read", address);
        }
        super::output_lines(&mut output, crate::scan::lines(&readings), args.details)?;
        super::output_totals(&mut output, crate::scan::totals(&readings))?;
        output.commit()?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn parses_addresses_and_ranges() {
            assert_eq!("216".parse(), Ok(AddressRange { first: 216, last: 216 }));
            assert_eq!("104-107".parse(), Ok(AddressRange { first: 104, last: 107 }));
            assert!("107-104".parse::<AddressRange>().is_err());
            assert!("x".parse::<AddressRange>().is_err());
            assert!("70000".parse::<AddressRange>().is_err());
        }
    }
}

pub mod write {
    use crate::codec::{self, Byte, EncodeError, Value};
    use crate::connection::{self, Transport, with_connection};
    use crate::output;
    use crate::registers::{self, RegisterIndex};
    use crate::setpoint::{self, Snapshot};
    use tracing::info;

    /// Write one holding register.
    ///
    /// The value is given in the register's units and encoded the way the register stores it.
    /// Packed registers need `--byte`; the other byte keeps its current value.
    #[derive(clap::Parser)]
    pub struct Args {
        address: u16,
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Which byte of a packed register to change.
        #[arg(long, value_enum)]
        byte: Option<Byte>,
        #[clap(flatten)]
        connection: connection::Args,
        #[clap(flatten)]
        output: output::Args,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("register {0} is not documented and will not be written")]
        UnknownRegister(u16),
        #[error("register {0} ({1}) is read-only")]
        ReadOnly(u16, &'static str),
        #[error("register {0} ({1}) holds two values, choose one with `--byte`")]
        NeedsByte(u16, &'static str),
        #[error("register {0} ({1}) is not packed, `--byte` does not apply")]
        NotPacked(u16, &'static str),
        #[error("value is not valid for register {1}")]
        Encode(#[source] EncodeError, u16),
        #[error("could not start the async runtime")]
        Runtime(#[source] std::io::Error),
        #[error("updating the register failed")]
        Setpoint(#[from] setpoint::Error),
        #[error("could not output the written value")]
        Output(#[from] output::Error),
    }

    /// A write that passed every check possible without talking to the device.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum Planned {
        Word { register: RegisterIndex, raw: u16 },
        /// Only `byte` changes, the other byte is read from the device first.
        Byte { register: RegisterIndex, byte: Byte, target: u8 },
    }

    impl Planned {
        pub fn register(&self) -> RegisterIndex {
            match *self {
                Planned::Word { register, .. } | Planned::Byte { register, .. } => register,
            }
        }
    }

    pub fn plan(address: u16, value: f64, byte: Option<Byte>) -> Result<Planned, Error> {
        let register = registers::lookup(address).ok_or(Error::UnknownRegister(address))?;
        if !register.is_writable() {
            return Err(Error::ReadOnly(address, register.name()));
        }
        match (register.is_packed(), byte) {
            (true, None) => Err(Error::NeedsByte(address, register.name())),
            (false, Some(_)) => Err(Error::NotPacked(address, register.name())),
            (true, Some(byte)) => {
                let target = codec::encode_byte(value).map_err(|e| Error::Encode(e, address))?;
                Ok(Planned::Byte { register, byte, target })
            }
            (false, None) => {
                let raw = register
                    .encoding()
                    .encode(value)
                    .map_err(|e| Error::Encode(e, address))?;
                Ok(Planned::Word { register, raw })
            }
        }
    }

    /// Register contents around a successful write.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Written {
        pub address: u16,
        /// Only known for packed registers, which are read before they are written.
        pub before: Option<u16>,
        pub after: u16,
    }

    pub async fn apply<T: Transport>(
        transport: &mut T,
        planned: Planned,
    ) -> Result<Written, setpoint::Error> {
        let address = planned.register().address();
        match planned {
            Planned::Word { raw, .. } => {
                setpoint::write(transport, address, raw).await?;
                Ok(Written { address, before: None, after: raw })
            }
            Planned::Byte { byte, target, .. } => {
                let snapshot = Snapshot::read(transport, address).await?;
                let raw = snapshot.replace(byte, target);
                setpoint::write(transport, address, raw).await?;
                Ok(Written { address, before: Some(snapshot.raw()), after: raw })
            }
        }
    }

    #[derive(serde::Serialize)]
    struct WrittenRecord {
        address: u16,
        name: &'static str,
        previous: Option<Value>,
        value: Value,
        raw: u16,
    }

    pub(crate) fn execute(
        connection: connection::Args,
        output: output::Args,
        planned: Planned,
    ) -> Result<(), Error> {
        let mut output = output.to_output()?;
        let written = super::block_on(with_connection(connection, async |connection| {
            apply(connection, planned).await
        }))
        .map_err(Error::Runtime)??;
        info!(
            message = "write complete",
            address = written.address,
            before = written.before,
            after = written.after
        );
        let register = planned.register();
        let previous = written.before.map(|raw| register.decode(raw));
        let value = register.decode(written.after);
        output.table_headers(vec!["Address", "Name", "Previous", "Value"])?;
        output.result(
            || {
                vec![
                    written.address.to_string(),
                    register.name().to_string(),
                    previous.map(|v| v.to_string()).unwrap_or_default(),
                    value.to_string(),
                ]
            },
            || WrittenRecord {
                address: written.address,
                name: register.name(),
                previous,
                value,
                raw: written.after,
            },
        )?;
        output.commit()?;
        Ok(())
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let planned = plan(args.address, args.value, args.byte)?;
        execute(args.connection, args.output, planned)
    }

}

pub mod set_target {
    use super::write::{self, Planned};
    use crate::codec::Byte;
    use crate::connection;
    use crate::output;

    /// Register holding the water temperature setpoints of both zones.
    const ZONE_SETPOINTS: u16 = 2;

    #[derive(clap::ValueEnum, Clone, Copy, Debug)]
    pub enum Zone {
        #[value(name = "1")]
        One,
        #[value(name = "2")]
        Two,
    }

    impl Zone {
        /// The byte of the setpoint register holding this zone's target.
        pub fn byte(self) -> Byte {
            match self {
                Zone::One => Byte::Low,
                Zone::Two => Byte::High,
            }
        }
    }

    /// Set the water temperature target of a heating zone.
    ///
    /// The other zone's target is read from the device and written back unchanged.
    #[derive(clap::Parser)]
    pub struct Args {
        /// Target water temperature in °C.
        #[arg(allow_negative_numbers = true)]
        temperature: f64,
        #[arg(long, value_enum, default_value = "1")]
        zone: Zone,
        #[clap(flatten)]
        connection: connection::Args,
        #[clap(flatten)]
        output: output::Args,
    }

    pub fn plan(zone: Zone, temperature: f64) -> Result<Planned, write::Error> {
        write::plan(ZONE_SETPOINTS, temperature, Some(zone.byte()))
    }

    pub fn run(args: Args) -> Result<(), write::Error> {
        let planned = plan(args.zone, args.temperature)?;
        write::execute(args.connection, args.output, planned)
    }

}
