mod sled_restart_case1;
