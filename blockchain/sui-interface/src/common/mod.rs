pub mod rpc_utils;
