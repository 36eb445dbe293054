//! Writers for synthetic capture files
#![allow(dead_code)]

pub const LINKTYPE_ETHERNET: i32 = 1;
pub const LINKTYPE_RAW: i32 = 101;

pub const OPT_COMMENT: u16 = 1;
pub const OPT_SHB_OS: u16 = 3;
pub const OPT_IF_NAME: u16 = 2;
pub const OPT_IF_TSRESOL: u16 = 9;
pub const OPT_IF_TSOFFSET: u16 = 14;

/// Packet used to build equivalent pcap and pcapng files
#[derive(Clone, Debug)]
pub struct TestPacket {
    pub ts_sec: u32,
    pub ts_usec: u32,
    pub origlen: u32,
    pub data: Vec<u8>,
}

impl TestPacket {
    pub fn new(ts_sec: u32, ts_usec: u32, data: &[u8]) -> TestPacket {
        TestPacket {
            ts_sec,
            ts_usec,
            origlen: data.len() as u32,
            data: data.to_vec(),
        }
    }

    /// Timestamp in microseconds
    pub fn ts_micros(&self) -> u64 {
        u64::from(self.ts_sec) * 1_000_000 + u64::from(self.ts_usec)
    }
}

/// Four frames with distinct sizes, one of them needing padding
pub fn sample_packets() -> Vec<TestPacket> {
    let mut packets = vec![
        TestPacket::new(1_340_954_905, 298_858, &[0x11; 60]),
        TestPacket::new(1_340_954_905, 300_001, &[0x22; 61]),
        TestPacket::new(1_340_954_906, 0, &[0x33; 1514]),
        TestPacket::new(1_340_954_907, 999_999, &[0x44; 42]),
    ];
    // truncated capture
    packets[2].origlen = 9000;
    packets
}

/// Builds a PcapNG stream, one block at a time
pub struct PcapNgWriter {
    big_endian: bool,
    buf: Vec<u8>,
}

impl PcapNgWriter {
    pub fn new(big_endian: bool) -> PcapNgWriter {
        PcapNgWriter {
            big_endian,
            buf: Vec::new(),
        }
    }

    /// Change the byte order of the following blocks (use before a new section)
    pub fn set_big_endian(&mut self, big_endian: bool) -> &mut Self {
        self.big_endian = big_endian;
        self
    }

    fn u16(&self, v: u16, out: &mut Vec<u8>) {
        if self.big_endian {
            out.extend_from_slice(&v.to_be_bytes());
        } else {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn u32(&self, v: u32, out: &mut Vec<u8>) {
        if self.big_endian {
            out.extend_from_slice(&v.to_be_bytes());
        } else {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn pad(out: &mut Vec<u8>) {
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }

    fn options(&self, options: &[(u16, &[u8])], out: &mut Vec<u8>) {
        if options.is_empty() {
            return;
        }
        for (code, value) in options {
            self.u16(*code, out);
            self.u16(value.len() as u16, out);
            out.extend_from_slice(value);
            Self::pad(out);
        }
        self.u16(0, out);
        self.u16(0, out);
    }

    /// Append a block with the given type and body (padded to 32 bits)
    pub fn block(&mut self, block_type: u32, body: &[u8]) -> &mut Self {
        let mut body = body.to_vec();
        Self::pad(&mut body);
        let len = (body.len() + 12) as u32;
        let mut out = Vec::new();
        self.u32(block_type, &mut out);
        self.u32(len, &mut out);
        out.extend_from_slice(&body);
        self.u32(len, &mut out);
        self.buf.extend_from_slice(&out);
        self
    }

    pub fn shb(&mut self, options: &[(u16, &[u8])]) -> &mut Self {
        let mut body = Vec::new();
        self.u32(0x1A2B_3C4D, &mut body);
        self.u16(1, &mut body);
        self.u16(0, &mut body);
        body.extend_from_slice(&[0xff; 8]);
        self.options(options, &mut body);
        self.block(0x0A0D_0D0A, &body)
    }

    pub fn idb(&mut self, linktype: i32, snaplen: u32, options: &[(u16, &[u8])]) -> &mut Self {
        let mut body = Vec::new();
        self.u16(linktype as u16, &mut body);
        self.u16(0, &mut body);
        self.u32(snaplen, &mut body);
        self.options(options, &mut body);
        self.block(1, &body)
    }

    /// if_tsoffset option value, in the byte order of the writer
    pub fn tsoffset(&self, offset: i64) -> Vec<u8> {
        if self.big_endian {
            offset.to_be_bytes().to_vec()
        } else {
            offset.to_le_bytes().to_vec()
        }
    }

    pub fn epb(&mut self, if_id: u32, ts: u64, origlen: u32, data: &[u8]) -> &mut Self {
        let mut body = Vec::new();
        self.u32(if_id, &mut body);
        self.u32((ts >> 32) as u32, &mut body);
        self.u32(ts as u32, &mut body);
        self.u32(data.len() as u32, &mut body);
        self.u32(origlen, &mut body);
        body.extend_from_slice(data);
        self.block(6, &body)
    }

    /// EPB with a captured length not matching the data
    pub fn epb_raw(&mut self, if_id: u32, caplen: u32, data: &[u8]) -> &mut Self {
        let mut body = Vec::new();
        self.u32(if_id, &mut body);
        self.u32(0, &mut body);
        self.u32(0, &mut body);
        self.u32(caplen, &mut body);
        self.u32(caplen, &mut body);
        body.extend_from_slice(data);
        self.block(6, &body)
    }

    pub fn spb(&mut self, origlen: u32, data: &[u8]) -> &mut Self {
        let mut body = Vec::new();
        self.u32(origlen, &mut body);
        body.extend_from_slice(data);
        self.block(3, &body)
    }

    pub fn pb(&mut self, if_id: u16, ts: u64, data: &[u8]) -> &mut Self {
        let mut body = Vec::new();
        self.u16(if_id, &mut body);
        self.u16(0, &mut body);
        self.u32((ts >> 32) as u32, &mut body);
        self.u32(ts as u32, &mut body);
        self.u32(data.len() as u32, &mut body);
        self.u32(data.len() as u32, &mut body);
        body.extend_from_slice(data);
        self.block(2, &body)
    }

    /// Interface Statistics Block, which readers skip
    pub fn isb(&mut self, if_id: u32) -> &mut Self {
        let mut body = Vec::new();
        self.u32(if_id, &mut body);
        self.u32(0, &mut body);
        self.u32(0, &mut body);
        self.block(5, &body)
    }

    pub fn packets(&mut self, if_id: u32, packets: &[TestPacket]) -> &mut Self {
        for p in packets {
            self.epb(if_id, p.ts_micros(), p.origlen, &p.data);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buf.clone()
    }
}

/// Build a single-section PcapNG file, with one interface and the given packets
pub fn pcapng_file(big_endian: bool, linktype: i32, packets: &[TestPacket]) -> Vec<u8> {
    let mut w = PcapNgWriter::new(big_endian);
    w.shb(&[(OPT_SHB_OS, &b"Linux"[..])])
        .idb(linktype, 65535, &[(OPT_IF_NAME, &b"eth0"[..])])
        .packets(0, packets);
    w.bytes()
}

/// Build a legacy pcap file (microsecond precision) with the given packets
pub fn pcap_file(big_endian: bool, linktype: i32, packets: &[TestPacket]) -> Vec<u8> {
    let u16b = |v: u16| {
        if big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        }
    };
    let u32b = |v: u32| {
        if big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        }
    };
    let mut out = Vec::new();
    out.extend_from_slice(&u32b(0xa1b2_c3d4));
    out.extend_from_slice(&u16b(2));
    out.extend_from_slice(&u16b(4));
    out.extend_from_slice(&u32b(0));
    out.extend_from_slice(&u32b(0));
    out.extend_from_slice(&u32b(65535));
    out.extend_from_slice(&u32b(linktype as u32));
    for p in packets {
        out.extend_from_slice(&u32b(p.ts_sec));
        out.extend_from_slice(&u32b(p.ts_usec));
        out.extend_from_slice(&u32b(p.data.len() as u32));
        out.extend_from_slice(&u32b(p.origlen));
        out.extend_from_slice(&p.data);
    }
    out
}
