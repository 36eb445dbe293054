use rusticata_macros::newtype_enum;

/// Data link type
///
/// The link-layer header type specifies the type of headers at the beginning
/// of the packet.
///
/// See <http://www.tcpdump.org/linktypes.html>
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Linktype(pub i32);

newtype_enum! {
impl display Linktype {
    NULL = 0,
    ETHERNET = 1,
    IEEE802_5 = 6,
    PPP = 9,
    FDDI = 10,
    RAW = 101,
    IEEE802_11 = 105,
    LOOP = 108,
    LINUX_SLL = 113,
    IEEE802_11_RADIOTAP = 127,
    USB_LINUX = 189,
    IPV4 = 228,
    IPV6 = 229,
    NFLOG = 239,
    WIRESHARK_UPPER_PDU = 252,
    LINUX_SLL2 = 276,
}
}
