mod two_flows_case1;
